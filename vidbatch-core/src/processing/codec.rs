// ============================================================================
// vidbatch-core/src/processing/codec.rs
// ============================================================================
//
// ENCODE ARGUMENTS: Codec Families and Quality Mapping
//
// The configured codec name is resolved once into a CodecFamily. Each family
// knows how to express the single quality dial: CRF for the software encoders,
// constant-quality VBR for the NVENC hardware encoders. Unknown names pass
// through with a plain -crf and a warning.

use std::fmt;

/// NVENC hardware encoder variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NvencKind {
    H264,
    Hevc,
    Av1,
}

impl NvencKind {
    #[must_use]
    pub fn encoder_name(self) -> &'static str {
        match self {
            Self::H264 => "h264_nvenc",
            Self::Hevc => "hevc_nvenc",
            Self::Av1 => "av1_nvenc",
        }
    }
}

/// Closed set of encoder families with known quality semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecFamily {
    X264,
    X265,
    SvtAv1,
    Vp9,
    Nvenc(NvencKind),
    /// Any other encoder name, passed to the encoder unchanged
    PassThrough(String),
}

impl CodecFamily {
    /// Resolves an encoder name. Matching is case-insensitive.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vidbatch_core::processing::{CodecFamily, NvencKind};
    ///
    /// assert_eq!(CodecFamily::resolve("libx265"), CodecFamily::X265);
    /// assert_eq!(CodecFamily::resolve("HEVC_NVENC"), CodecFamily::Nvenc(NvencKind::Hevc));
    /// assert!(CodecFamily::resolve("foo_enc").is_pass_through());
    /// ```
    #[must_use]
    pub fn resolve(name: &str) -> Self {
        let name = name.trim();
        match name.to_ascii_lowercase().as_str() {
            "libx264" => Self::X264,
            "libx265" => Self::X265,
            "libsvtav1" => Self::SvtAv1,
            "libvpx-vp9" => Self::Vp9,
            "h264_nvenc" => Self::Nvenc(NvencKind::H264),
            "hevc_nvenc" => Self::Nvenc(NvencKind::Hevc),
            "av1_nvenc" => Self::Nvenc(NvencKind::Av1),
            _ => Self::PassThrough(name.to_string()),
        }
    }

    /// Name handed to the encoder's `-c:v`.
    #[must_use]
    pub fn encoder_name(&self) -> &str {
        match self {
            Self::X264 => "libx264",
            Self::X265 => "libx265",
            Self::SvtAv1 => "libsvtav1",
            Self::Vp9 => "libvpx-vp9",
            Self::Nvenc(kind) => kind.encoder_name(),
            Self::PassThrough(name) => name,
        }
    }

    #[must_use]
    pub fn is_pass_through(&self) -> bool {
        matches!(self, Self::PassThrough(_))
    }

    #[must_use]
    pub fn is_hardware(&self) -> bool {
        matches!(self, Self::Nvenc(_))
    }

    /// Codec arguments for the given quality value.
    #[must_use]
    pub fn encode_args(&self, quality: u32) -> Vec<String> {
        let q = quality.to_string();
        let q = q.as_str();
        let tail = match self {
            Self::X264 | Self::X265 => vec!["-crf", q, "-preset", "medium"],
            Self::SvtAv1 => vec!["-crf", q, "-preset", "6"],
            Self::Vp9 => vec!["-crf", q, "-b:v", "0", "-row-mt", "1"],
            Self::Nvenc(_) => vec![
                "-rc:v", "vbr", "-cq:v", q, "-preset", "p5", "-tune", "hq", "-b:v", "0",
            ],
            Self::PassThrough(_) => vec!["-crf", q],
        };

        let mut args = vec!["-c:v".to_string(), self.encoder_name().to_string()];
        args.extend(tail.into_iter().map(str::to_string));
        args
    }
}

impl fmt::Display for CodecFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encoder_name())
    }
}

/// Resolves `codec` and maps `quality` to its arguments, warning on unknown
/// encoder names.
pub fn map_encode_args(codec: &str, quality: u32) -> (CodecFamily, Vec<String>) {
    let family = CodecFamily::resolve(codec);
    if family.is_pass_through() {
        log::warn!(
            "Unknown video codec '{codec}', passing it through with -crf {quality}"
        );
    }
    let args = family.encode_args(quality);
    (family, args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(codec: &str, quality: u32) -> String {
        map_encode_args(codec, quality).1.join(" ")
    }

    #[test]
    fn test_software_encoders() {
        assert_eq!(joined("libx264", 23), "-c:v libx264 -crf 23 -preset medium");
        assert_eq!(joined("libx265", 28), "-c:v libx265 -crf 28 -preset medium");
        assert_eq!(joined("libsvtav1", 30), "-c:v libsvtav1 -crf 30 -preset 6");
        assert_eq!(joined("libvpx-vp9", 31), "-c:v libvpx-vp9 -crf 31 -b:v 0 -row-mt 1");
    }

    #[test]
    fn test_nvenc_uses_vbr_constant_quality() {
        assert_eq!(
            joined("h264_nvenc", 22),
            "-c:v h264_nvenc -rc:v vbr -cq:v 22 -preset p5 -tune hq -b:v 0"
        );
        let args = map_encode_args("av1_nvenc", 35).1;
        assert!(!args.contains(&"-crf".to_string()));
        assert_eq!(args[1], "av1_nvenc");
    }

    #[test]
    fn test_unknown_codec_passes_through() {
        let (family, args) = map_encode_args("foo_enc", 20);
        assert_eq!(family, CodecFamily::PassThrough("foo_enc".to_string()));
        assert_eq!(args.join(" "), "-c:v foo_enc -crf 20");
    }

    #[test]
    fn test_resolution_is_case_insensitive() {
        assert_eq!(CodecFamily::resolve(" LibX264 "), CodecFamily::X264);
        assert!(CodecFamily::resolve("h264_nvenc").is_hardware());
        assert!(!CodecFamily::X264.is_hardware());
    }
}
