//! Batch orchestration.
//!
//! This module ties the pipeline together: the encode plan is derived once
//! from the configuration, every candidate is run through the encoder in
//! order, and the successful outputs are optionally concatenated.
//!
//! ```text
//! BatchConfig -> estimate_dimensions -> select_profile -> FilterChain
//!             -> EncodePlan (+ codec, hwaccel, audio args)
//!             -> run_batch -> run_concat -> RunReport
//! ```

/// Output geometry estimation
pub mod dimensions;

/// Size buckets for denoise and sharpen parameters
pub mod filter_profile;

/// Ordered filter chain construction
pub mod filters;

/// Codec families and quality arguments
pub mod codec;

/// Per-run encode plan
pub mod plan;

/// Sequential per-file execution
pub mod batch;

/// Manifest and stream-copy concatenation
pub mod concat;

pub use batch::{BatchOutcome, FileJob, JobStatus, check_output_paths, run_batch};
pub use codec::{CodecFamily, NvencKind, map_encode_args};
pub use concat::{ConcatManifest, MANIFEST_FILE_NAME, manifest_path, run_concat};
pub use dimensions::{DimensionEstimate, estimate_dimensions};
pub use filter_profile::{FILTER_PROFILES, FilterProfile, SharpenParams, select_profile};
pub use filters::{FilterChain, FilterStage};
pub use plan::{EncodePlan, PlanReport, output_path_for};

use crate::config::BatchConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::Encoder;
use crate::hardware_decode::HardwareDecoding;
use crate::notifications::{Notification, Notifier, notify_or_warn};
use crate::summary::{ConcatStatus, RunSummary};
use crate::utils::get_hostname;

use chrono::{DateTime, Local};
use serde::Serialize;

use std::fs;
use std::path::{Path, PathBuf};

/// Everything known about a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub summary: RunSummary,
    pub plan: PlanReport,
    pub jobs: Vec<FileJob>,
    /// Outputs handed to concatenation, in order
    pub concat_manifest: ConcatManifest,
    /// Joined output, when concatenation ran
    pub concat_output: Option<PathBuf>,
}

impl RunReport {
    /// Writes the report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> CoreResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Prepares the output directory for a run and returns its absolute path.
///
/// Creates the directory when absent and removes any concat manifest left by
/// an earlier run.
pub fn prepare_output_dir(output_dir: &Path) -> CoreResult<PathBuf> {
    let dir = std::path::absolute(output_dir).map_err(|source| CoreError::OutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    fs::create_dir_all(&dir).map_err(|source| CoreError::OutputDir {
        path: dir.clone(),
        source,
    })?;

    concat::remove_stale_manifest(&dir)?;
    Ok(dir)
}

/// A batch whose preconditions have passed.
///
/// Nothing in the output directory is touched until [`PreparedBatch::prepare`]
/// has checked the encoder, the candidates and their output paths. Callers
/// that keep their own files under the output directory, such as a run log,
/// create them between `prepare` and [`PreparedBatch::run`].
pub struct PreparedBatch<'a, E: Encoder + ?Sized> {
    encoder: &'a E,
    config: &'a BatchConfig,
    candidates: &'a [PathBuf],
    output_dir: PathBuf,
    started_at: DateTime<Local>,
}

impl<'a, E: Encoder + ?Sized> PreparedBatch<'a, E> {
    /// Checks every precondition, then creates the output directory.
    ///
    /// # Errors
    ///
    /// * `CoreError::DependencyNotFound` - The encoder cannot be started
    /// * `CoreError::NoFilesFound` - No candidates
    /// * `CoreError::OutputCollision` / `CoreError::ConcatOutputCollision` -
    ///   Two files, or a file and the concat output, share an output path
    /// * `CoreError::OutputDir` - The output directory cannot be created
    pub fn prepare(
        encoder: &'a E,
        config: &'a BatchConfig,
        candidates: &'a [PathBuf],
    ) -> CoreResult<Self> {
        let started_at = Local::now();
        encoder.verify()?;

        if candidates.is_empty() {
            return Err(CoreError::NoFilesFound(config.input_mask.clone()));
        }

        check_output_paths(config, &config.output_dir, candidates)?;

        let output_dir = prepare_output_dir(&config.output_dir)?;
        log::info!(
            "Processing {} file(s) into {}",
            candidates.len(),
            output_dir.display()
        );

        Ok(Self {
            encoder,
            config,
            candidates,
            output_dir,
            started_at,
        })
    }

    /// Absolute output directory of the run.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Runs the plan, the per-file encodes, concat and the completion
    /// notification. Per-file and concat failures end up in the report.
    pub fn run(self, notifier: Option<&dyn Notifier>) -> RunReport {
        let Self {
            encoder,
            config,
            candidates,
            output_dir,
            started_at,
        } = self;

        let hardware = HardwareDecoding::detect(encoder, &config.hwaccel);
        hardware.log_capabilities();

        let plan = EncodePlan::new(config, &hardware);
        plan.log_summary();

        let BatchOutcome {
            jobs,
            mut summary,
            manifest,
        } = run_batch(encoder, &plan, config, &output_dir, candidates, notifier);

        summary.concat_status =
            run_concat(encoder, config, &output_dir, &manifest, summary.succeeded);
        let concat_output = (summary.concat_status == ConcatStatus::Succeeded)
            .then(|| output_dir.join(&config.concat.output_name));

        log::info!("Batch finished: {summary}");
        notify_or_warn(
            notifier,
            &Notification::RunComplete {
                summary,
                hostname: get_hostname(),
            },
        );

        RunReport {
            started_at,
            finished_at: Local::now(),
            summary,
            plan: PlanReport::from(&plan),
            jobs,
            concat_manifest: manifest,
            concat_output,
        }
    }
}

/// Runs a whole batch: preconditions, plan, per-file encodes, concat and the
/// completion notification.
///
/// Precondition failures (unusable encoder, no candidates, colliding output
/// paths, output directory not creatable) are returned as errors before
/// anything is written. Once the loop starts, per-file and concat failures
/// are recorded in the report and never returned as errors.
///
/// # Arguments
///
/// * `encoder` - The encoder used for every invocation
/// * `notifier` - Optional backend for failure and completion notifications
/// * `config` - The run configuration
/// * `candidates` - Input files in processing order
///
/// # Examples
///
/// ```rust,no_run
/// use vidbatch_core::config::BatchConfig;
/// use vidbatch_core::external::SidecarEncoder;
/// use vidbatch_core::{find_candidate_files, process_batch};
/// use std::path::Path;
///
/// let config = BatchConfig::from_file(Path::new("vidbatch.toml")).unwrap();
/// let encoder = SidecarEncoder::new(&config.encoder_path);
/// let candidates = find_candidate_files(&config.input_mask).unwrap();
///
/// let report = process_batch(&encoder, None, &config, &candidates).unwrap();
/// println!("{}", report.summary);
/// ```
pub fn process_batch<E: Encoder + ?Sized>(
    encoder: &E,
    notifier: Option<&dyn Notifier>,
    config: &BatchConfig,
    candidates: &[PathBuf],
) -> CoreResult<RunReport> {
    Ok(PreparedBatch::prepare(encoder, config, candidates)?.run(notifier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_prepare_output_dir_creates_and_cleans() {
        let root = tempdir().unwrap();
        let out = root.path().join("nested/out");

        let dir = prepare_output_dir(&out).unwrap();
        assert!(dir.is_absolute());
        assert!(dir.is_dir());

        fs::write(manifest_path(&dir), "stale").unwrap();
        prepare_output_dir(&out).unwrap();
        assert!(!manifest_path(&dir).exists());
    }

    #[test]
    fn test_prepare_output_dir_under_a_file_fails() {
        let root = tempdir().unwrap();
        let blocker = root.path().join("file");
        fs::write(&blocker, b"x").unwrap();

        let result = prepare_output_dir(&blocker.join("out"));
        assert!(matches!(result, Err(CoreError::OutputDir { .. })));
    }
}
