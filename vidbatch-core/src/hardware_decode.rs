//! Hardware decoding detection and negotiation.
//!
//! Availability is checked once per run by asking the encoder for its list of
//! `-hwaccel` methods. The resulting flags depend on whether the run has a
//! filter chain: accelerated frame output cannot feed CPU filters, so when any
//! filter is present only decoding is accelerated.
//!
//! **Important**: This module is ONLY for hardware DECODING. Hardware encoding
//! is selected through the video codec.

use crate::config::HwAccelConfig;
use crate::external::Encoder;

/// Hardware decoding availability for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareDecoding {
    /// `-hwaccel` method name
    pub method: String,

    /// Whether the encoder reported the method as supported
    pub available: bool,
}

impl HardwareDecoding {
    /// Hardware decoding switched off.
    #[must_use]
    pub fn unavailable(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            available: false,
        }
    }

    /// Asks the encoder whether it supports the configured method.
    ///
    /// A failed query is logged and treated as "not available".
    pub fn detect<E: Encoder + ?Sized>(encoder: &E, config: &HwAccelConfig) -> Self {
        if !config.enabled {
            log::debug!("Hardware decoding disabled by configuration");
            return Self::unavailable(&config.method);
        }

        let available = match encoder.hwaccel_methods() {
            Ok(methods) => methods
                .iter()
                .any(|m| m.eq_ignore_ascii_case(&config.method)),
            Err(e) => {
                log::warn!("Could not query hardware decode methods: {e}");
                false
            }
        };

        Self {
            method: config.method.clone(),
            available,
        }
    }

    /// Logs information about hardware decoding capabilities.
    pub fn log_capabilities(&self) {
        if self.available {
            log::info!("Hardware decoding: {} available", self.method);
        } else {
            log::info!("Hardware decoding: None");
        }
    }

    /// Gets the encoder arguments for hardware decoding.
    ///
    /// | available | filters | arguments                               |
    /// |-----------|---------|-----------------------------------------|
    /// | no        | any     | none                                    |
    /// | yes       | no      | `-hwaccel M -hwaccel_output_format M`   |
    /// | yes       | yes     | `-hwaccel M`                            |
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vidbatch_core::hardware_decode::HardwareDecoding;
    ///
    /// let hw = HardwareDecoding { method: "cuda".into(), available: true };
    /// assert_eq!(hw.hwaccel_args(true), vec!["-hwaccel", "cuda"]);
    /// ```
    #[must_use]
    pub fn hwaccel_args(&self, has_filters: bool) -> Vec<String> {
        if !self.available {
            return Vec::new();
        }

        let mut args = vec!["-hwaccel".to_string(), self.method.clone()];
        if !has_filters {
            args.push("-hwaccel_output_format".to_string());
            args.push(self.method.clone());
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, CoreResult};
    use crate::external::{Diagnostics, EncoderJob};

    struct HwaccelsOnly(CoreResult<Vec<String>>);

    impl Encoder for HwaccelsOnly {
        fn hwaccel_methods(&self) -> CoreResult<Vec<String>> {
            match &self.0 {
                Ok(methods) => Ok(methods.clone()),
                Err(_) => Err(CoreError::DependencyNotFound("hwaccels".to_string())),
            }
        }

        fn run(&self, _job: &EncoderJob) -> CoreResult<Diagnostics> {
            unreachable!("only lists hwaccels")
        }
    }

    fn config(enabled: bool) -> HwAccelConfig {
        HwAccelConfig {
            enabled,
            method: "cuda".to_string(),
        }
    }

    #[test]
    fn test_negotiation_table() {
        let available = HardwareDecoding {
            method: "cuda".to_string(),
            available: true,
        };
        assert_eq!(
            available.hwaccel_args(false),
            vec!["-hwaccel", "cuda", "-hwaccel_output_format", "cuda"]
        );
        assert_eq!(available.hwaccel_args(true), vec!["-hwaccel", "cuda"]);

        let unavailable = HardwareDecoding::unavailable("cuda");
        assert!(unavailable.hwaccel_args(false).is_empty());
        assert!(unavailable.hwaccel_args(true).is_empty());
    }

    #[test]
    fn test_detect_finds_configured_method() {
        let encoder = HwaccelsOnly(Ok(vec!["vaapi".to_string(), "CUDA".to_string()]));
        assert!(HardwareDecoding::detect(&encoder, &config(true)).available);
    }

    #[test]
    fn test_detect_missing_method() {
        let encoder = HwaccelsOnly(Ok(vec!["vaapi".to_string()]));
        assert!(!HardwareDecoding::detect(&encoder, &config(true)).available);
    }

    #[test]
    fn test_query_failure_means_unavailable() {
        let encoder = HwaccelsOnly(Err(CoreError::Config(String::new())));
        assert!(!HardwareDecoding::detect(&encoder, &config(true)).available);
    }

    #[test]
    fn test_disabled_never_queries_encoder() {
        let encoder = HwaccelsOnly(Ok(vec!["cuda".to_string()]));
        let hw = HardwareDecoding::detect(&encoder, &config(false));
        assert!(!hw.available);
        assert_eq!(hw.method, "cuda");
    }
}
