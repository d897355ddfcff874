//! Per-run encode plan.
//!
//! Everything that is identical for every file in a batch is derived here,
//! once, before the first job runs.

use crate::config::BatchConfig;
use crate::hardware_decode::HardwareDecoding;

use super::codec::{CodecFamily, map_encode_args};
use super::dimensions::{DimensionEstimate, estimate_dimensions};
use super::filter_profile::{FilterProfile, select_profile};
use super::filters::FilterChain;

use serde::Serialize;

use std::path::{Path, PathBuf};

/// Encoder settings shared by every job of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodePlan {
    pub dimensions: DimensionEstimate,
    pub profile: &'static FilterProfile,
    pub filter_chain: FilterChain,
    pub codec: CodecFamily,
    pub codec_args: Vec<String>,
    pub hwaccel_args: Vec<String>,
    pub audio_args: Vec<String>,
}

impl EncodePlan {
    /// Derives the plan from the configuration and the detected hardware
    /// decoding support.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vidbatch_core::config::BatchConfigBuilder;
    /// use vidbatch_core::hardware_decode::HardwareDecoding;
    /// use vidbatch_core::processing::EncodePlan;
    ///
    /// let config = BatchConfigBuilder::new()
    ///     .input_mask("*.mov")
    ///     .video_codec("h264_nvenc")
    ///     .quality(22)
    ///     .build();
    /// let plan = EncodePlan::new(&config, &HardwareDecoding::unavailable("cuda"));
    ///
    /// assert!(plan.codec_args.contains(&"-cq:v".to_string()));
    /// assert!(plan.filter_string().is_none());
    /// ```
    #[must_use]
    pub fn new(config: &BatchConfig, hardware: &HardwareDecoding) -> Self {
        let dimensions = estimate_dimensions(&config.crop, &config.scale);
        let profile = select_profile(dimensions.max_dimension());
        let filter_chain = FilterChain::from_config(config, profile);
        let (codec, codec_args) = map_encode_args(&config.video_codec, config.quality);
        let hwaccel_args = hardware.hwaccel_args(!filter_chain.is_empty());
        let audio_args = vec!["-c:a".to_string(), config.audio_codec.clone()];

        Self {
            dimensions,
            profile,
            filter_chain,
            codec,
            codec_args,
            hwaccel_args,
            audio_args,
        }
    }

    #[must_use]
    pub fn filter_string(&self) -> Option<String> {
        self.filter_chain.to_filter_string()
    }

    /// Logs the plan at info level.
    pub fn log_summary(&self) {
        match self.dimensions.max_dimension() {
            Some(d) => log::info!("Estimated max output dimension: {d}"),
            None => log::info!("Estimated max output dimension: unknown"),
        }
        log::info!(
            "Filter chain: {}",
            self.filter_string().unwrap_or_else(|| "none".to_string())
        );
        if self.codec.is_hardware() {
            log::info!("Video encoder: {} (hardware)", self.codec.encoder_name());
        } else {
            log::info!("Video encoder: {}", self.codec.encoder_name());
        }
        log::info!("Codec arguments: {}", self.codec_args.join(" "));
        if self.hwaccel_args.is_empty() {
            log::info!("Hardware decode arguments: none");
        } else {
            log::info!("Hardware decode arguments: {}", self.hwaccel_args.join(" "));
        }
        log::info!("Audio arguments: {}", self.audio_args.join(" "));
    }
}

/// Serializable view of a plan, used for `vidbatch plan` and JSON reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanReport {
    pub estimated_width: Option<u32>,
    pub estimated_height: Option<u32>,
    pub profile_upper_bound: Option<u32>,
    pub filter_chain: Option<String>,
    pub codec: String,
    /// Whether the video encoder runs on the GPU
    pub hardware_encode: bool,
    pub codec_args: Vec<String>,
    pub hwaccel_args: Vec<String>,
    pub audio_args: Vec<String>,
}

impl From<&EncodePlan> for PlanReport {
    fn from(plan: &EncodePlan) -> Self {
        Self {
            estimated_width: plan.dimensions.width,
            estimated_height: plan.dimensions.height,
            profile_upper_bound: plan.profile.upper_bound,
            filter_chain: plan.filter_string(),
            codec: plan.codec.to_string(),
            hardware_encode: plan.codec.is_hardware(),
            codec_args: plan.codec_args.clone(),
            hwaccel_args: plan.hwaccel_args.clone(),
            audio_args: plan.audio_args.clone(),
        }
    }
}

/// Output path for an input: `output_dir/<stem>.<extension>`.
#[must_use]
pub fn output_path_for(input: &Path, output_dir: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .unwrap_or_else(|| input.as_os_str())
        .to_string_lossy();
    output_dir.join(format!("{stem}.{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BatchConfigBuilder;
    use crate::processing::filter_profile::FILTER_PROFILES;

    fn cuda() -> HardwareDecoding {
        HardwareDecoding {
            method: "cuda".to_string(),
            available: true,
        }
    }

    #[test]
    fn test_scale_with_unknown_height_selects_1750_bucket() {
        let config = BatchConfigBuilder::new()
            .input_mask("*.mp4")
            .scale("scale=1280:-1")
            .denoise(true)
            .sharpen(true)
            .build();
        let plan = EncodePlan::new(&config, &HardwareDecoding::unavailable("cuda"));

        assert_eq!(plan.profile, &FILTER_PROFILES[1]);
        assert_eq!(
            plan.filter_string().as_deref(),
            Some("scale=1280:-1,hqdn3d=3.0:2.0:4.0:4.0,unsharp=5:5:0.8:5:5:0.0")
        );
    }

    #[test]
    fn test_hwaccel_without_filters_keeps_frames_on_device() {
        let config = BatchConfigBuilder::new().input_mask("*.mp4").build();
        let plan = EncodePlan::new(&config, &cuda());
        assert_eq!(
            plan.hwaccel_args.join(" "),
            "-hwaccel cuda -hwaccel_output_format cuda"
        );
    }

    #[test]
    fn test_hwaccel_with_filters_is_decode_only() {
        let config = BatchConfigBuilder::new()
            .input_mask("*.mp4")
            .denoise(true)
            .build();
        let plan = EncodePlan::new(&config, &cuda());
        assert_eq!(plan.hwaccel_args.join(" "), "-hwaccel cuda");
    }

    #[test]
    fn test_plan_is_deterministic() {
        let config = BatchConfigBuilder::new()
            .input_mask("*.mp4")
            .crop("crop=1920:800:0:140")
            .sharpen(true)
            .video_codec("libsvtav1")
            .build();
        assert_eq!(EncodePlan::new(&config, &cuda()), EncodePlan::new(&config, &cuda()));
    }

    #[test]
    fn test_audio_args_follow_config() {
        let config = BatchConfigBuilder::new()
            .input_mask("*.mp4")
            .audio_codec("aac")
            .build();
        let plan = EncodePlan::new(&config, &HardwareDecoding::unavailable("cuda"));
        assert_eq!(plan.audio_args, vec!["-c:a", "aac"]);
    }

    #[test]
    fn test_plan_report() {
        let config = BatchConfigBuilder::new()
            .input_mask("*.mp4")
            .scale("scale=3840:2160")
            .build();
        let report = PlanReport::from(&EncodePlan::new(&config, &cuda()));
        assert_eq!(report.estimated_width, Some(3840));
        assert_eq!(report.profile_upper_bound, None);
        assert_eq!(report.codec, "libx264");
        assert!(!report.hardware_encode);

        let config = BatchConfigBuilder::new()
            .input_mask("*.mp4")
            .video_codec("hevc_nvenc")
            .build();
        let report = PlanReport::from(&EncodePlan::new(&config, &cuda()));
        assert!(report.hardware_encode);
    }

    #[test]
    fn test_output_path_for() {
        let path = output_path_for(Path::new("/in/My Clip.v2.mov"), Path::new("/out"), "mp4");
        assert_eq!(path, PathBuf::from("/out/My Clip.v2.mp4"));
    }
}
