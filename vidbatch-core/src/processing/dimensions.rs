//! Output geometry estimation.
//!
//! The estimate is only used to pick a filter profile, so it is deliberately
//! forgiving: any token that is not a positive integer is treated as unknown
//! for that axis and never aborts the run.

use crate::config::StageConfig;

/// Estimated output dimensions. Either axis may be unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DimensionEstimate {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl DimensionEstimate {
    /// An estimate with neither axis known.
    pub const UNKNOWN: Self = Self {
        width: None,
        height: None,
    };

    /// Largest known axis, or `None` when both are unknown.
    #[must_use]
    pub fn max_dimension(&self) -> Option<u32> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some(w.max(h)),
            (Some(w), None) => Some(w),
            (None, Some(h)) => Some(h),
            (None, None) => None,
        }
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }
}

/// Estimates the output geometry from the crop and scale stages.
///
/// Scale wins when it yields at least one numeric axis; otherwise the crop
/// width and height are used; otherwise the estimate is unknown.
///
/// # Examples
///
/// ```rust
/// use vidbatch_core::config::StageConfig;
/// use vidbatch_core::processing::estimate_dimensions;
///
/// let crop = StageConfig::enabled("crop=1920:800:0:140");
/// let scale = StageConfig::enabled("scale=1280:-1");
///
/// let estimate = estimate_dimensions(&crop, &scale);
/// assert_eq!(estimate.width, Some(1280));
/// assert_eq!(estimate.height, None);
/// assert_eq!(estimate.max_dimension(), Some(1280));
/// ```
#[must_use]
pub fn estimate_dimensions(crop: &StageConfig, scale: &StageConfig) -> DimensionEstimate {
    if let Some(expr) = scale.active_expr() {
        let estimate = parse_axes(expr, "scale=");
        if !estimate.is_unknown() {
            return estimate;
        }
        log::debug!("Scale expression '{expr}' has no numeric axis, falling back to crop");
    }

    if let Some(expr) = crop.active_expr() {
        return parse_axes(expr, "crop=");
    }

    DimensionEstimate::UNKNOWN
}

/// Reads the first two `:`-separated tokens after an optional filter prefix.
fn parse_axes(expr: &str, prefix: &str) -> DimensionEstimate {
    let body = expr.trim();
    let body = body.strip_prefix(prefix).unwrap_or(body);
    let mut tokens = body.split(':');

    DimensionEstimate {
        width: tokens.next().and_then(parse_axis),
        height: tokens.next().and_then(parse_axis),
    }
}

/// A positive integer is a known axis. `-1`, other negatives, zero and
/// expressions such as `iw/2` are unknown.
fn parse_axis(token: &str) -> Option<u32> {
    token
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|v| *v > 0)
        .and_then(|v| u32::try_from(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn off() -> StageConfig {
        StageConfig::default()
    }

    #[test]
    fn test_scale_both_axes() {
        let est = estimate_dimensions(&off(), &StageConfig::enabled("scale=1920:1080"));
        assert_eq!(est.width, Some(1920));
        assert_eq!(est.height, Some(1080));
        assert_eq!(est.max_dimension(), Some(1920));
    }

    #[test]
    fn test_scale_negative_axis_is_unknown_for_that_axis_only() {
        let est = estimate_dimensions(&off(), &StageConfig::enabled("scale=-1:2160"));
        assert_eq!(est.width, None);
        assert_eq!(est.height, Some(2160));
        assert_eq!(est.max_dimension(), Some(2160));

        let est = estimate_dimensions(&off(), &StageConfig::enabled("scale=-2:-1"));
        assert!(est.is_unknown());
    }

    #[test]
    fn test_scale_takes_precedence_over_crop() {
        let crop = StageConfig::enabled("crop=3840:1600:0:280");
        let scale = StageConfig::enabled("scale=1280:720");
        assert_eq!(estimate_dimensions(&crop, &scale).max_dimension(), Some(1280));
    }

    #[test]
    fn test_falls_back_to_crop_when_scale_has_no_numeric_axis() {
        let crop = StageConfig::enabled("crop=1440:1080:240:0");
        let scale = StageConfig::enabled("scale=iw/2:-1");
        let est = estimate_dimensions(&crop, &scale);
        assert_eq!(est.width, Some(1440));
        assert_eq!(est.height, Some(1080));
    }

    #[test]
    fn test_bare_crop_expression() {
        let est = estimate_dimensions(&StageConfig::enabled("1000:600:10:10"), &off());
        assert_eq!(est.max_dimension(), Some(1000));
    }

    #[test]
    fn test_disabled_stages_are_ignored() {
        let crop = StageConfig {
            enabled: false,
            expr: "crop=3840:2160:0:0".to_string(),
        };
        let scale = StageConfig {
            enabled: false,
            expr: "scale=640:360".to_string(),
        };
        assert_eq!(estimate_dimensions(&crop, &scale), DimensionEstimate::UNKNOWN);
    }

    #[test]
    fn test_garbage_never_panics() {
        for expr in ["", "scale=", "crop=abc:def", ":::", "scale=99999999999:x"] {
            let stage = StageConfig::enabled(expr);
            let est = estimate_dimensions(&stage, &stage);
            assert_eq!(est.max_dimension(), None, "expression {expr:?}");
        }
    }
}
