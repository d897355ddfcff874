// ============================================================================
// vidbatch-core/src/processing/batch.rs
// ============================================================================
//
// BATCH EXECUTION: Sequential Per-File Encode Loop
//
// Each candidate becomes a FileJob. A job whose output already exists is
// skipped unless overwriting is enabled; every other job is handed to the
// encoder with the shared EncodePlan. A failed job is recorded and the loop
// moves on. Exactly one encoder invocation is in flight at any time.

use crate::config::BatchConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{Encoder, EncoderJob};
use crate::notifications::{Notification, Notifier, notify_or_warn};
use crate::summary::RunSummary;
use crate::terminal;
use crate::utils::{format_duration, get_hostname};

use super::concat::ConcatManifest;
use super::plan::{EncodePlan, output_path_for};

use serde::Serialize;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// State of a single file job. Every state except `Pending` is terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Pending,
    /// The output existed and overwriting is disabled
    Skipped,
    Succeeded,
    Failed { error: String },
}

impl JobStatus {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// One input file and its derived output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileJob {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    #[serde(flatten)]
    status: JobStatus,
}

impl FileJob {
    /// Creates a pending job writing into `output_dir`.
    #[must_use]
    pub fn new(input_path: PathBuf, output_dir: &Path, extension: &str) -> Self {
        let output_path = output_path_for(&input_path, output_dir, extension);
        Self {
            input_path,
            output_path,
            status: JobStatus::Pending,
        }
    }

    #[must_use]
    pub fn status(&self) -> &JobStatus {
        &self.status
    }

    /// Moves the job to a terminal state. Later transitions are ignored.
    pub fn finish(&mut self, status: JobStatus) {
        if self.status.is_terminal() {
            log::warn!(
                "Ignoring status change for already finished job {}",
                self.input_path.display()
            );
            return;
        }
        self.status = status;
    }

    /// Encoder job for this file under `plan`.
    #[must_use]
    pub fn encoder_job(&self, plan: &EncodePlan) -> EncoderJob {
        EncoderJob::Transcode {
            input: self.input_path.clone(),
            output: self.output_path.clone(),
            filter_chain: plan.filter_string(),
            codec_args: plan.codec_args.clone(),
            hwaccel_args: plan.hwaccel_args.clone(),
            audio_args: plan.audio_args.clone(),
        }
    }

    fn display_name(&self) -> String {
        self.input_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input_path.display().to_string())
    }
}

/// Result of the batch stage, before concatenation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub jobs: Vec<FileJob>,
    pub summary: RunSummary,
    pub manifest: ConcatManifest,
}

/// Checks that every candidate gets an output of its own.
///
/// Two inputs with the same stem (`a.mkv` and `a.mov`) map to the same
/// output, and an input named after the concat output would be overwritten
/// by the join. Both are rejected before anything is written.
pub fn check_output_paths(
    config: &BatchConfig,
    output_dir: &Path,
    candidates: &[PathBuf],
) -> CoreResult<()> {
    let concat_output = config
        .concat
        .enabled
        .then(|| output_dir.join(&config.concat.output_name));

    let mut owners: HashMap<PathBuf, &PathBuf> = HashMap::with_capacity(candidates.len());
    for input in candidates {
        let output = output_path_for(input, output_dir, config.extension());

        if concat_output.as_ref() == Some(&output) {
            return Err(CoreError::ConcatOutputCollision {
                output,
                input: input.clone(),
            });
        }

        if let Some(first) = owners.get(&output) {
            return Err(CoreError::OutputCollision {
                output,
                first: (*first).clone(),
                second: input.clone(),
            });
        }
        owners.insert(output, input);
    }
    Ok(())
}

/// Runs every candidate through the encoder in order.
///
/// `candidates` must already be in processing order. Successful outputs are
/// appended to the manifest when concatenation is enabled. A job whose output
/// was already written earlier in the same run fails instead of overwriting
/// it.
pub fn run_batch<E: Encoder + ?Sized>(
    encoder: &E,
    plan: &EncodePlan,
    config: &BatchConfig,
    output_dir: &Path,
    candidates: &[PathBuf],
    notifier: Option<&dyn Notifier>,
) -> BatchOutcome {
    let mut summary = RunSummary::new(candidates.len());
    let mut manifest = ConcatManifest::new();
    let mut jobs: Vec<FileJob> = candidates
        .iter()
        .map(|input| FileJob::new(input.clone(), output_dir, config.extension()))
        .collect();

    let total = jobs.len();
    let mut written: HashSet<PathBuf> = HashSet::with_capacity(total);
    for (index, job) in jobs.iter_mut().enumerate() {
        let name = job.display_name();
        terminal::print_processing(&format!("[{}/{}] {name}", index + 1, total));

        if written.contains(&job.output_path) {
            let error = format!(
                "{} was already written by an earlier file in this run",
                job.output_path.display()
            );
            log::error!("Encoding {name} failed: {error}");
            job.finish(JobStatus::Failed { error });
            summary.failed += 1;
            continue;
        }

        if job.output_path.exists() && !config.overwrite_existing {
            terminal::print_sub_item(&format!(
                "Skipped: {} already exists",
                job.output_path.display()
            ));
            job.finish(JobStatus::Skipped);
            summary.skipped += 1;
            continue;
        }

        let started = Instant::now();
        match encoder.run(&job.encoder_job(plan)) {
            Ok(diagnostics) => {
                if !diagnostics.warnings.is_empty() {
                    log::debug!(
                        "{name}: encoder reported {} warning(s)",
                        diagnostics.warnings.len()
                    );
                }
                terminal::print_success(&format!(
                    "Encoded {} in {}",
                    job.output_path.display(),
                    format_duration(started.elapsed().as_secs_f64())
                ));
                job.finish(JobStatus::Succeeded);
                summary.succeeded += 1;
                written.insert(job.output_path.clone());
                if config.concat.enabled {
                    manifest.push(job.output_path.clone());
                }
            }
            Err(e) => {
                let error = e.to_string();
                log::error!("Encoding {name} failed: {error}");
                notify_or_warn(
                    notifier,
                    &Notification::FileFailed {
                        input_path: job.input_path.clone(),
                        message: error.clone(),
                        hostname: get_hostname(),
                    },
                );
                job.finish(JobStatus::Failed { error });
                summary.failed += 1;
            }
        }
    }

    BatchOutcome {
        jobs,
        summary,
        manifest,
    }
}
