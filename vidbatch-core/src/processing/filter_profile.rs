// ============================================================================
// vidbatch-core/src/processing/filter_profile.rs
// ============================================================================
//
// FILTER PROFILES: Denoise and Sharpen Parameters by Output Size
//
// Four fixed buckets partition the positive integers by the largest output
// axis. Larger outputs get stronger denoising and a wider sharpening kernel.
// The parameter values are handed to the encoder verbatim.

/// Parameters for the `unsharp` filter:
/// luma matrix size, luma amount, chroma matrix size, chroma amount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharpenParams {
    pub luma_x: u32,
    pub luma_y: u32,
    pub luma_amount: f32,
    pub chroma_x: u32,
    pub chroma_y: u32,
    pub chroma_amount: f32,
}

/// Denoise and sharpen parameters for one size bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterProfile {
    /// Inclusive upper bound of the bucket; `None` is unbounded
    pub upper_bound: Option<u32>,

    /// `hqdn3d` luma spatial, chroma spatial, luma temporal, chroma temporal
    pub denoise: [f32; 4],

    pub sharpen: SharpenParams,
}

const fn sharpen(matrix: u32, amount: f32) -> SharpenParams {
    SharpenParams {
        luma_x: matrix,
        luma_y: matrix,
        luma_amount: amount,
        chroma_x: matrix,
        chroma_y: matrix,
        chroma_amount: 0.0,
    }
}

/// Buckets in ascending order of upper bound.
pub const FILTER_PROFILES: [FilterProfile; 4] = [
    FilterProfile {
        upper_bound: Some(1250),
        denoise: [2.3, 1.5, 3.0, 3.0],
        sharpen: sharpen(3, 0.7),
    },
    FilterProfile {
        upper_bound: Some(1750),
        denoise: [3.0, 2.0, 4.0, 4.0],
        sharpen: sharpen(5, 0.8),
    },
    FilterProfile {
        upper_bound: Some(2250),
        denoise: [3.7, 2.4, 4.9, 4.9],
        sharpen: sharpen(7, 0.87),
    },
    FilterProfile {
        upper_bound: None,
        denoise: [4.4, 3.0, 5.9, 5.9],
        sharpen: sharpen(9, 0.97),
    },
];

/// Index of the bucket used when the output size is unknown.
const FALLBACK_PROFILE: usize = 1;

/// Selects the filter profile for the largest output axis.
///
/// Unknown sizes (and zero) use the 1750 bucket.
///
/// # Examples
///
/// ```rust
/// use vidbatch_core::processing::select_profile;
///
/// assert_eq!(select_profile(Some(1280)).upper_bound, Some(1750));
/// assert_eq!(select_profile(Some(3840)).upper_bound, None);
/// assert_eq!(select_profile(None).upper_bound, Some(1750));
/// ```
#[must_use]
pub fn select_profile(max_dimension: Option<u32>) -> &'static FilterProfile {
    let Some(dimension) = max_dimension.filter(|d| *d > 0) else {
        return &FILTER_PROFILES[FALLBACK_PROFILE];
    };

    FILTER_PROFILES
        .iter()
        .find(|profile| profile.upper_bound.is_none_or(|bound| dimension <= bound))
        .unwrap_or(&FILTER_PROFILES[FILTER_PROFILES.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(d: Option<u32>) -> usize {
        let selected = select_profile(d);
        FILTER_PROFILES
            .iter()
            .position(|p| p == selected)
            .unwrap()
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(bucket(Some(1)), 0);
        assert_eq!(bucket(Some(1250)), 0);
        assert_eq!(bucket(Some(1251)), 1);
        assert_eq!(bucket(Some(1750)), 1);
        assert_eq!(bucket(Some(1751)), 2);
        assert_eq!(bucket(Some(2250)), 2);
        assert_eq!(bucket(Some(2251)), 3);
        assert_eq!(bucket(Some(u32::MAX)), 3);
    }

    #[test]
    fn test_unknown_and_zero_use_fallback_bucket() {
        assert_eq!(bucket(None), 1);
        assert_eq!(bucket(Some(0)), 1);
    }

    #[test]
    fn test_buckets_are_monotonic() {
        let mut last = 0;
        for d in (1..=5000).step_by(7) {
            let b = bucket(Some(d));
            assert!(b >= last, "bucket decreased at {d}");
            last = b;
        }
    }

    #[test]
    fn test_profile_values() {
        let p = select_profile(Some(1920));
        assert_eq!(p.denoise, [3.7, 2.4, 4.9, 4.9]);
        assert_eq!(p.sharpen, sharpen(7, 0.87));

        let p = select_profile(Some(720));
        assert_eq!(p.denoise, [2.3, 1.5, 3.0, 3.0]);
        assert_eq!(p.sharpen.luma_x, 3);
    }
}
