//! ffmpeg-sidecar backed [`Encoder`] implementation.
//!
//! Jobs are spawned through `FfmpegCommand::new_with_path`, so any
//! ffmpeg-compatible binary can be configured. Log and error events are
//! forwarded to the `log` facade under the `ffmpeg_log` target and kept as
//! [`Diagnostics`]; progress events drive an [`EncodeSpinner`].

use crate::error::{CoreError, CoreResult, command_failed_error};
use crate::progress::EncodeSpinner;

use super::{Diagnostics, Encoder, EncoderJob, check_dependency};

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel as FfmpegLogLevel};

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Number of trailing error lines carried into a failure message.
const FAILURE_CONTEXT_LINES: usize = 5;

/// Encoder that drives an ffmpeg-compatible executable.
#[derive(Debug, Clone)]
pub struct SidecarEncoder {
    path: PathBuf,
}

impl SidecarEncoder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn name(&self) -> String {
        self.path.display().to_string()
    }
}

impl Encoder for SidecarEncoder {
    fn verify(&self) -> CoreResult<()> {
        check_dependency(&self.path)
    }

    fn hwaccel_methods(&self) -> CoreResult<Vec<String>> {
        let output = Command::new(&self.path)
            .args(["-hide_banner", "-hwaccels"])
            .stdin(Stdio::null())
            .output()
            .map_err(|e| CoreError::CommandStart(self.name(), e))?;

        if !output.status.success() {
            return Err(command_failed_error(
                format!("{} -hwaccels", self.name()),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(parse_hwaccel_list(&String::from_utf8_lossy(&output.stdout)))
    }

    fn run(&self, job: &EncoderJob) -> CoreResult<Diagnostics> {
        let args = job.to_args();
        log::debug!("Running {}: {} {}", job.label(), self.name(), args.join(" "));

        let mut cmd = FfmpegCommand::new_with_path(&self.path);
        cmd.args(&args);

        let mut child = cmd
            .spawn()
            .map_err(|e| CoreError::CommandStart(self.name(), e))?;

        let spinner = EncodeSpinner::start(spinner_label(job));
        let mut diagnostics = Diagnostics::default();

        match child.iter() {
            Ok(events) => {
                for event in events {
                    handle_event(event, &spinner, &mut diagnostics);
                }
            }
            Err(e) => {
                log::error!("Failed to read encoder events: {e}");
                diagnostics.errors.push(e.to_string());
            }
        }
        spinner.finish();

        let status = child
            .wait()
            .map_err(|e| CoreError::CommandWait(self.name(), e))?;

        if status.success() {
            Ok(diagnostics)
        } else {
            Err(command_failed_error(
                format!("{} ({})", self.name(), job.label()),
                status,
                diagnostics.error_tail(FAILURE_CONTEXT_LINES),
            ))
        }
    }
}

fn spinner_label(job: &EncoderJob) -> String {
    let name = job
        .output()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match job {
        EncoderJob::Transcode { .. } => format!("Encoding {name}"),
        EncoderJob::Concat { .. } => format!("Concatenating into {name}"),
    }
}

fn handle_event(event: FfmpegEvent, spinner: &EncodeSpinner, diagnostics: &mut Diagnostics) {
    match event {
        FfmpegEvent::Progress(progress) => spinner.update(&progress.time, progress.speed),
        FfmpegEvent::Log(level, message) => match level {
            FfmpegLogLevel::Fatal | FfmpegLogLevel::Error => {
                log::error!(target: "ffmpeg_log", "{message}");
                diagnostics.errors.push(message);
            }
            FfmpegLogLevel::Warning => {
                log::warn!(target: "ffmpeg_log", "{message}");
                diagnostics.warnings.push(message);
            }
            _ => log::trace!(target: "ffmpeg_log", "{message}"),
        },
        FfmpegEvent::Error(error) => {
            log::debug!(target: "ffmpeg_log", "stderr: {error}");
            diagnostics.errors.push(error);
        }
        _ => {}
    }
}

/// Parses the output of `ffmpeg -hwaccels`: a header line followed by one
/// method name per line.
fn parse_hwaccel_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.ends_with(':'))
        .map(str::to_string)
        .collect()
}
