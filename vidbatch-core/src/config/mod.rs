//! Configuration structures and constants for the vidbatch-core library.
//!
//! A [`BatchConfig`] is materialized once per run, either from a TOML file
//! ([`BatchConfig::from_file`]) or through [`BatchConfigBuilder`], and is never
//! mutated afterwards. Every component of the pipeline borrows it read-only.

mod builder;

use crate::error::{CoreError, CoreResult};

use serde::{Deserialize, Serialize};

use std::path::{Path, PathBuf};

pub use builder::BatchConfigBuilder;

// Default constants

/// Default encoder executable, resolved through `PATH`.
pub const DEFAULT_ENCODER_PATH: &str = "ffmpeg";

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Default container extension for per-file outputs.
pub const DEFAULT_OUTPUT_EXTENSION: &str = "mp4";

/// Default video encoder.
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";

/// Default quality dial (CRF for software encoders, CQ for hardware VBR).
pub const DEFAULT_QUALITY: u32 = 23;

/// Highest quality value accepted by any supported encoder family.
pub const MAX_QUALITY: u32 = 63;

/// Default audio handling: copy the source streams untouched.
pub const DEFAULT_AUDIO_CODEC: &str = "copy";

/// Default hardware decode method looked for on the encoder.
pub const DEFAULT_HWACCEL_METHOD: &str = "cuda";

/// Default file name of the concatenated output.
pub const DEFAULT_CONCAT_OUTPUT_NAME: &str = "concat.mp4";

/// An optional filter stage carrying a user-supplied expression.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Whether the stage is part of the filter chain
    pub enabled: bool,

    /// Filter expression, e.g. `crop=1920:800:0:140` or `scale=1280:-1`
    pub expr: String,
}

impl StageConfig {
    /// Creates an enabled stage with the given expression.
    pub fn enabled(expr: impl Into<String>) -> Self {
        Self {
            enabled: true,
            expr: expr.into(),
        }
    }

    /// Returns the expression when the stage is enabled.
    #[must_use]
    pub fn active_expr(&self) -> Option<&str> {
        self.enabled.then_some(self.expr.as_str())
    }
}

/// Final stream-copy concatenation of all successful outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcatConfig {
    pub enabled: bool,

    /// File name of the joined output inside the output directory
    pub output_name: String,
}

impl Default for ConcatConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            output_name: DEFAULT_CONCAT_OUTPUT_NAME.to_string(),
        }
    }
}

/// Hardware-accelerated decode settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HwAccelConfig {
    /// Whether to detect and use hardware decoding
    pub enabled: bool,

    /// ffmpeg `-hwaccel` method name (`cuda`, `vaapi`, `qsv`, `videotoolbox`, ...)
    pub method: String,
}

impl Default for HwAccelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            method: DEFAULT_HWACCEL_METHOD.to_string(),
        }
    }
}

/// Main configuration structure for a batch run.
///
/// # Examples
///
/// ```rust
/// use vidbatch_core::config::BatchConfig;
///
/// let config = BatchConfig::from_toml_str(r#"
///     input_mask = "input/*.mp4"
///     video_codec = "hevc_nvenc"
///     quality = 24
///     denoise = true
///
///     [scale]
///     enabled = true
///     expr = "scale=1920:-1"
/// "#).unwrap();
///
/// assert_eq!(config.quality, 24);
/// assert!(config.scale.enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    // ---- Paths ----
    /// Encoder executable (name resolved through PATH, or a full path)
    pub encoder_path: PathBuf,

    /// Glob pattern selecting the candidate input files
    pub input_mask: String,

    /// Destination of all outputs, created if absent
    pub output_dir: PathBuf,

    /// Extension given to every per-file output (without the dot)
    pub output_extension: String,

    // ---- Encoder settings ----
    /// Encoder name, mapped to a codec family
    pub video_codec: String,

    /// Single quality dial; CRF for software encoders, CQ for hardware VBR encoders
    pub quality: u32,

    /// Audio codec passed as `-c:a`
    pub audio_codec: String,

    /// Re-encode files whose output already exists instead of skipping them
    pub overwrite_existing: bool,

    // ---- Filter stages, applied in this order ----
    pub crop: StageConfig,
    pub scale: StageConfig,
    pub denoise: bool,
    pub sharpen: bool,

    // ---- Post-processing ----
    pub concat: ConcatConfig,
    pub hwaccel: HwAccelConfig,

    // ---- Notifications ----
    /// Optional ntfy.sh topic URL for run notifications
    pub ntfy_topic: Option<String>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            encoder_path: PathBuf::from(DEFAULT_ENCODER_PATH),
            input_mask: String::new(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_extension: DEFAULT_OUTPUT_EXTENSION.to_string(),
            video_codec: DEFAULT_VIDEO_CODEC.to_string(),
            quality: DEFAULT_QUALITY,
            audio_codec: DEFAULT_AUDIO_CODEC.to_string(),
            overwrite_existing: false,
            crop: StageConfig::default(),
            scale: StageConfig::default(),
            denoise: false,
            sharpen: false,
            concat: ConcatConfig::default(),
            hwaccel: HwAccelConfig::default(),
            ntfy_topic: None,
        }
    }
}

impl BatchConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Loads a configuration file from disk.
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Checks the configuration for values no run could succeed with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.input_mask.trim().is_empty() {
            return Err(CoreError::Config("input_mask must not be empty".to_string()));
        }

        if self.encoder_path.as_os_str().is_empty() {
            return Err(CoreError::Config("encoder_path must not be empty".to_string()));
        }

        if self.quality > MAX_QUALITY {
            return Err(CoreError::Config(format!(
                "quality must be between 0 and {MAX_QUALITY}, got {}",
                self.quality
            )));
        }

        if self.output_extension.trim_start_matches('.').is_empty() {
            return Err(CoreError::Config("output_extension must not be empty".to_string()));
        }

        if self.video_codec.trim().is_empty() {
            return Err(CoreError::Config("video_codec must not be empty".to_string()));
        }

        for (name, stage) in [("crop", &self.crop), ("scale", &self.scale)] {
            if stage.enabled && stage.expr.trim().is_empty() {
                return Err(CoreError::Config(format!(
                    "{name} is enabled but {name}.expr is empty"
                )));
            }
        }

        if self.concat.enabled {
            let name = self.concat.output_name.trim();
            if name.is_empty() {
                return Err(CoreError::Config(
                    "concat is enabled but concat.output_name is empty".to_string(),
                ));
            }
            if name.contains('/') || name.contains('\\') {
                return Err(CoreError::Config(format!(
                    "concat.output_name must be a plain file name, got '{name}'"
                )));
            }
        }

        if self.hwaccel.enabled && self.hwaccel.method.trim().is_empty() {
            return Err(CoreError::Config(
                "hwaccel is enabled but hwaccel.method is empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Output extension without a leading dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        self.output_extension.trim_start_matches('.')
    }
}
