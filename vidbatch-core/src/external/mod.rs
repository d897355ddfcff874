// ============================================================================
// vidbatch-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: The Encoder Boundary
//
// Everything vidbatch asks of the external encoder goes through the Encoder
// trait: verifying that the executable resolves, listing its hardware decode
// methods, and running one job. The batch pipeline never builds a process
// itself, so tests can substitute a recording implementation.
//
// KEY COMPONENTS:
// - Encoder: trait implemented by SidecarEncoder and by test doubles
// - EncoderJob: a transcode or concat invocation, rendered to arguments here
// - Diagnostics: warning and error text reported by a successful invocation
// - check_dependency: `-version` check used by Encoder::verify

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// ffmpeg-sidecar backed encoder implementation
pub mod ffmpeg;

pub use ffmpeg::SidecarEncoder;

// ============================================================================
// ENCODER JOBS
// ============================================================================

/// One invocation of the external encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncoderJob {
    /// Re-encode a single input file.
    Transcode {
        input: PathBuf,
        output: PathBuf,
        /// Rendered filter chain, `None` when no stage is enabled
        filter_chain: Option<String>,
        codec_args: Vec<String>,
        hwaccel_args: Vec<String>,
        audio_args: Vec<String>,
    },

    /// Join the files listed in a concat manifest without re-encoding.
    Concat { manifest: PathBuf, output: PathBuf },
}

impl EncoderJob {
    /// Path the job writes to.
    #[must_use]
    pub fn output(&self) -> &Path {
        match self {
            Self::Transcode { output, .. } | Self::Concat { output, .. } => output,
        }
    }

    /// Short label used in logs and error messages.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Transcode { .. } => "transcode",
            Self::Concat { .. } => "concat",
        }
    }

    /// Renders the job as encoder command-line arguments.
    ///
    /// Hardware decode flags must precede the input they apply to.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vidbatch_core::external::EncoderJob;
    ///
    /// let job = EncoderJob::Concat {
    ///     manifest: "out/.vidbatch-concat.txt".into(),
    ///     output: "out/concat.mp4".into(),
    /// };
    /// assert_eq!(
    ///     job.to_args().join(" "),
    ///     "-hide_banner -f concat -safe 0 -i out/.vidbatch-concat.txt -c copy -y out/concat.mp4"
    /// );
    /// ```
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["-hide_banner".to_string()];
        match self {
            Self::Transcode {
                input,
                output,
                filter_chain,
                codec_args,
                hwaccel_args,
                audio_args,
            } => {
                args.extend(hwaccel_args.iter().cloned());
                args.push("-i".to_string());
                args.push(input.display().to_string());
                if let Some(chain) = filter_chain {
                    args.push("-vf".to_string());
                    args.push(chain.clone());
                }
                args.extend(codec_args.iter().cloned());
                args.extend(audio_args.iter().cloned());
                args.push("-y".to_string());
                args.push(output.display().to_string());
            }
            Self::Concat { manifest, output } => {
                args.extend(
                    ["-f", "concat", "-safe", "0", "-i"]
                        .iter()
                        .map(|s| (*s).to_string()),
                );
                args.push(manifest.display().to_string());
                args.extend(["-c", "copy", "-y"].iter().map(|s| (*s).to_string()));
                args.push(output.display().to_string());
            }
        }
        args
    }
}

/// Warning and error lines reported by an encoder invocation.
///
/// Logged for the operator; never parsed to make decisions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Diagnostics {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty() && self.errors.is_empty()
    }

    /// Last few error lines, joined, for use in a failure message.
    #[must_use]
    pub fn error_tail(&self, lines: usize) -> String {
        let start = self.errors.len().saturating_sub(lines);
        self.errors[start..].join("\n")
    }
}

// ============================================================================
// ENCODER TRAIT
// ============================================================================

/// The external encoder capability.
///
/// # Examples
///
/// ```rust
/// use vidbatch_core::external::{Diagnostics, Encoder, EncoderJob};
/// use vidbatch_core::CoreResult;
///
/// struct TouchEncoder;
///
/// impl Encoder for TouchEncoder {
///     fn run(&self, job: &EncoderJob) -> CoreResult<Diagnostics> {
///         std::fs::write(job.output(), b"")?;
///         Ok(Diagnostics::default())
///     }
/// }
/// ```
pub trait Encoder {
    /// Checks that the encoder can be launched at all.
    fn verify(&self) -> CoreResult<()> {
        Ok(())
    }

    /// Lists the hardware decode methods the encoder supports.
    fn hwaccel_methods(&self) -> CoreResult<Vec<String>> {
        Ok(Vec::new())
    }

    /// Runs one job to completion.
    ///
    /// # Returns
    ///
    /// * `Ok(Diagnostics)` - The encoder exited successfully
    /// * `Err(CoreError)` - The encoder could not be started or exited non-zero
    fn run(&self, job: &EncoderJob) -> CoreResult<Diagnostics>;
}

impl<E: Encoder + ?Sized> Encoder for &E {
    fn verify(&self) -> CoreResult<()> {
        (**self).verify()
    }

    fn hwaccel_methods(&self) -> CoreResult<Vec<String>> {
        (**self).hwaccel_methods()
    }

    fn run(&self, job: &EncoderJob) -> CoreResult<Diagnostics> {
        (**self).run(job)
    }
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks if an external command is available and executable.
///
/// Runs the command with `-version` and discards its output. Any exit status
/// counts as found; only a failure to start is an error.
///
/// # Returns
///
/// * `Ok(())` - If the command could be started
/// * `Err(CoreError::DependencyNotFound)` - If the command is not found
/// * `Err(CoreError::CommandStart)` - If the command exists but fails to start
pub(crate) fn check_dependency(cmd: &Path) -> CoreResult<()> {
    let name = cmd.display().to_string();

    let result = Command::new(cmd)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {name}");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{name}' not found.");
            Err(CoreError::DependencyNotFound(name))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{name}': {e}");
            Err(CoreError::CommandStart(name, e))
        }
    }
}
