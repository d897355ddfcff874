//! Video filter chain construction.
//!
//! Stages are held as structured values and only rendered to the encoder's
//! `a,b,c` filter syntax at the command boundary. The chain always renders in
//! crop, scale, denoise, sharpen order regardless of insertion order.

use crate::config::BatchConfig;

use super::filter_profile::{FilterProfile, SharpenParams};

use std::fmt;

/// One stage of the video filter chain.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterStage {
    /// `crop=W:H:X:Y`; holds the arguments after the `crop=` prefix
    Crop(String),
    /// `scale=W:H`; holds the arguments after the `scale=` prefix
    Scale(String),
    /// `hqdn3d` spatial/temporal strengths
    Denoise([f32; 4]),
    /// `unsharp` kernel sizes and amounts
    Sharpen(SharpenParams),
}

impl FilterStage {
    /// Crop stage from a user expression; the `crop=` prefix is optional.
    #[must_use]
    pub fn crop(expr: &str) -> Self {
        Self::Crop(strip_filter_name(expr, "crop"))
    }

    /// Scale stage from a user expression; the `scale=` prefix is optional.
    #[must_use]
    pub fn scale(expr: &str) -> Self {
        Self::Scale(strip_filter_name(expr, "scale"))
    }

    /// Position of the stage in the rendered chain.
    fn rank(&self) -> u8 {
        match self {
            Self::Crop(_) => 0,
            Self::Scale(_) => 1,
            Self::Denoise(_) => 2,
            Self::Sharpen(_) => 3,
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::Crop(args) | Self::Scale(args) => args.is_empty(),
            Self::Denoise(_) | Self::Sharpen(_) => false,
        }
    }
}

impl fmt::Display for FilterStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Crop(args) => write!(f, "crop={args}"),
            Self::Scale(args) => write!(f, "scale={args}"),
            Self::Denoise(params) => {
                let values: Vec<String> = params.iter().map(|v| format_param(*v)).collect();
                write!(f, "hqdn3d={}", values.join(":"))
            }
            Self::Sharpen(p) => write!(
                f,
                "unsharp={}:{}:{}:{}:{}:{}",
                p.luma_x,
                p.luma_y,
                format_param(p.luma_amount),
                p.chroma_x,
                p.chroma_y,
                format_param(p.chroma_amount)
            ),
        }
    }
}

/// Ordered set of filter stages.
///
/// # Examples
///
/// ```rust
/// use vidbatch_core::processing::{FilterChain, FilterStage};
///
/// let chain = FilterChain::new()
///     .with_stage(FilterStage::scale("scale=1280:-1"))
///     .with_stage(FilterStage::crop("1920:800:0:140"));
///
/// assert_eq!(
///     chain.to_filter_string().as_deref(),
///     Some("crop=1920:800:0:140,scale=1280:-1")
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterChain {
    stages: Vec<FilterStage>,
}

impl FilterChain {
    /// Creates a new empty filter chain
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the chain for a run: user crop and scale expressions plus the
    /// denoise and sharpen parameters of the selected profile.
    #[must_use]
    pub fn from_config(config: &BatchConfig, profile: &FilterProfile) -> Self {
        let mut chain = Self::new();
        if let Some(expr) = config.crop.active_expr() {
            chain.push(FilterStage::crop(expr));
        }
        if let Some(expr) = config.scale.active_expr() {
            chain.push(FilterStage::scale(expr));
        }
        if config.denoise {
            chain.push(FilterStage::Denoise(profile.denoise));
        }
        if config.sharpen {
            chain.push(FilterStage::Sharpen(profile.sharpen));
        }
        chain
    }

    /// Adds a stage to the chain
    #[must_use]
    pub fn with_stage(mut self, stage: FilterStage) -> Self {
        self.push(stage);
        self
    }

    /// Inserts a stage at its fixed position. A stage of a kind already
    /// present replaces it; empty crop or scale arguments are ignored.
    pub fn push(&mut self, stage: FilterStage) {
        if stage.is_empty() {
            return;
        }
        match self.stages.iter().position(|s| s.rank() >= stage.rank()) {
            Some(i) if self.stages[i].rank() == stage.rank() => self.stages[i] = stage,
            Some(i) => self.stages.insert(i, stage),
            None => self.stages.push(stage),
        }
    }

    #[must_use]
    pub fn stages(&self) -> &[FilterStage] {
        &self.stages
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Renders the chain as a single filter string, `None` when empty.
    #[must_use]
    pub fn to_filter_string(&self) -> Option<String> {
        if self.stages.is_empty() {
            None
        } else {
            let rendered: Vec<String> = self.stages.iter().map(ToString::to_string).collect();
            Some(rendered.join(","))
        }
    }
}

fn strip_filter_name(expr: &str, name: &str) -> String {
    let expr = expr.trim();
    expr.strip_prefix(name)
        .and_then(|rest| rest.strip_prefix('='))
        .unwrap_or(expr)
        .trim()
        .to_string()
}

/// Integral values keep one decimal place (`3.0`, not `3`).
fn format_param(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
