// ============================================================================
// vidbatch-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for BatchConfig
//
// Fluent construction of BatchConfig values. The CLI uses it to layer
// command-line overrides on top of a loaded configuration file, and tests use
// it to describe runs without writing TOML.

use std::path::PathBuf;

use super::{BatchConfig, StageConfig};

/// Builder for creating [`BatchConfig`] instances.
///
/// # Examples
///
/// ```rust
/// use vidbatch_core::config::BatchConfigBuilder;
///
/// let config = BatchConfigBuilder::new()
///     .input_mask("input/*.mp4")
///     .output_dir("encoded")
///     .video_codec("libx265")
///     .quality(26)
///     .scale("scale=1280:-1")
///     .denoise(true)
///     .concat("joined.mp4")
///     .build();
///
/// assert!(config.concat.enabled);
/// assert_eq!(config.quality, 26);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    /// Creates a builder starting from the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder starting from an existing configuration.
    #[must_use]
    pub fn from_config(config: BatchConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn encoder_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.encoder_path = path.into();
        self
    }

    #[must_use]
    pub fn input_mask(mut self, mask: impl Into<String>) -> Self {
        self.config.input_mask = mask.into();
        self
    }

    #[must_use]
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    #[must_use]
    pub fn output_extension(mut self, extension: impl Into<String>) -> Self {
        self.config.output_extension = extension.into();
        self
    }

    #[must_use]
    pub fn video_codec(mut self, codec: impl Into<String>) -> Self {
        self.config.video_codec = codec.into();
        self
    }

    #[must_use]
    pub fn quality(mut self, quality: u32) -> Self {
        self.config.quality = quality;
        self
    }

    #[must_use]
    pub fn audio_codec(mut self, codec: impl Into<String>) -> Self {
        self.config.audio_codec = codec.into();
        self
    }

    #[must_use]
    pub fn overwrite_existing(mut self, overwrite: bool) -> Self {
        self.config.overwrite_existing = overwrite;
        self
    }

    /// Enables the crop stage with the given expression.
    #[must_use]
    pub fn crop(mut self, expr: impl Into<String>) -> Self {
        self.config.crop = StageConfig::enabled(expr);
        self
    }

    /// Enables the scale stage with the given expression.
    #[must_use]
    pub fn scale(mut self, expr: impl Into<String>) -> Self {
        self.config.scale = StageConfig::enabled(expr);
        self
    }

    #[must_use]
    pub fn denoise(mut self, enabled: bool) -> Self {
        self.config.denoise = enabled;
        self
    }

    #[must_use]
    pub fn sharpen(mut self, enabled: bool) -> Self {
        self.config.sharpen = enabled;
        self
    }

    /// Enables concatenation into `output_name`.
    #[must_use]
    pub fn concat(mut self, output_name: impl Into<String>) -> Self {
        self.config.concat.enabled = true;
        self.config.concat.output_name = output_name.into();
        self
    }

    /// Enables or disables hardware decode probing.
    #[must_use]
    pub fn hwaccel(mut self, enabled: bool) -> Self {
        self.config.hwaccel.enabled = enabled;
        self
    }

    #[must_use]
    pub fn hwaccel_method(mut self, method: impl Into<String>) -> Self {
        self.config.hwaccel.method = method.into();
        self
    }

    #[must_use]
    pub fn ntfy_topic(mut self, topic: impl Into<String>) -> Self {
        self.config.ntfy_topic = Some(topic.into());
        self
    }

    /// Finishes the builder. Call [`BatchConfig::validate`] before running.
    #[must_use]
    pub fn build(self) -> BatchConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_match_config_defaults() {
        assert_eq!(BatchConfigBuilder::new().build(), BatchConfig::default());
    }

    #[test]
    fn test_builder_overrides_loaded_config() {
        let loaded = BatchConfig {
            input_mask: "a/*.mp4".to_string(),
            quality: 30,
            ..Default::default()
        };

        let config = BatchConfigBuilder::from_config(loaded)
            .quality(20)
            .overwrite_existing(true)
            .build();

        assert_eq!(config.input_mask, "a/*.mp4");
        assert_eq!(config.quality, 20);
        assert!(config.overwrite_existing);
    }

    #[test]
    fn test_builder_stage_helpers_enable_stages() {
        let config = BatchConfigBuilder::new()
            .crop("crop=100:100:0:0")
            .scale("scale=640:360")
            .concat("out.mp4")
            .hwaccel(false)
            .build();

        assert_eq!(config.crop.active_expr(), Some("crop=100:100:0:0"));
        assert_eq!(config.scale.active_expr(), Some("scale=640:360"));
        assert!(config.concat.enabled);
        assert_eq!(config.concat.output_name, "out.mp4");
        assert!(!config.hwaccel.enabled);
    }
}
