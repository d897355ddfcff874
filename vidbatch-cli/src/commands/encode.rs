//! Implementation of the 'encode' subcommand.
//!
//! This module handles candidate discovery, notifier setup and delegation to
//! the vidbatch-core library, then prints the run summary.

use crate::cli::EncodeArgs;
use crate::error::CliResult;
use crate::logging::{self, RunLogFile};

use vidbatch_core::config::BatchConfig;
use vidbatch_core::notifications::{Notifier, NtfyNotifier};
use vidbatch_core::terminal;
use vidbatch_core::{
    ConcatStatus, JobStatus, PreparedBatch, RunReport, SidecarEncoder, find_candidate_files,
    format_duration,
};

use std::time::Instant;

use log::{debug, warn};

/// Builds the ntfy notifier from `--ntfy` or the configuration.
///
/// An unusable topic URL disables notifications for the run.
pub fn build_notifier(cli_topic: Option<&str>, config: &BatchConfig) -> Option<NtfyNotifier> {
    let topic = cli_topic.or(config.ntfy_topic.as_deref())?;
    match NtfyNotifier::new(topic) {
        Ok(notifier) => {
            debug!("Notifications enabled for topic {}", notifier.topic());
            Some(notifier)
        }
        Err(e) => {
            warn!("Notifications disabled: {e}");
            None
        }
    }
}

/// Main entry point for the encode command.
///
/// Errors are precondition failures. Per-file and concat failures are
/// reported in the returned summary. `run_log` is opened once the batch has
/// passed its preconditions.
pub fn run_encode(
    args: &EncodeArgs,
    config: &BatchConfig,
    run_log: Option<&RunLogFile>,
) -> CliResult<RunReport> {
    let start_time = Instant::now();

    terminal::print_section("VIDBATCH");
    terminal::print_status("Input mask", &config.input_mask, false);
    terminal::print_status("Output dir", &config.output_dir.display().to_string(), false);
    terminal::print_status(
        "Codec",
        &format!("{} (quality {})", config.video_codec, config.quality),
        false,
    );

    let encoder = SidecarEncoder::new(&config.encoder_path);
    let candidates = find_candidate_files(&config.input_mask)?;
    debug!("Discovered {} candidate file(s)", candidates.len());

    let notifier = build_notifier(args.ntfy.as_deref(), config);
    let batch = PreparedBatch::prepare(&encoder, config, &candidates)?;
    if let Some(run_log) = run_log {
        logging::start_run_log(run_log);
    }
    let report = batch.run(notifier.as_ref().map(|n| n as &dyn Notifier));

    print_run_summary(&report, start_time.elapsed().as_secs_f64());

    if let Some(path) = &args.summary_json {
        match report.write_json(path) {
            Ok(()) => terminal::print_status("Report", &path.display().to_string(), false),
            Err(e) => warn!("Could not write run report to {}: {e}", path.display()),
        }
    }

    Ok(report)
}

fn print_run_summary(report: &RunReport, elapsed_secs: f64) {
    let summary = &report.summary;

    terminal::print_section("RUN SUMMARY");
    terminal::print_status(
        "Processed",
        &format!("{} of {}", summary.processed(), summary.total),
        false,
    );
    terminal::print_status("Succeeded", &summary.succeeded.to_string(), false);
    terminal::print_status("Skipped", &summary.skipped.to_string(), false);
    terminal::print_status("Failed", &summary.failed.to_string(), summary.failed > 0);
    terminal::print_status(
        "Concat",
        &summary.concat_status.to_string(),
        summary.concat_status == ConcatStatus::Failed,
    );
    if let Some(output) = &report.concat_output {
        terminal::print_status("Concat output", &output.display().to_string(), false);
    }
    terminal::print_status("Total time", &format_duration(elapsed_secs), false);

    for job in &report.jobs {
        if let JobStatus::Failed { error } = job.status() {
            terminal::print_warning(&format!("{}: {error}", job.input_path.display()));
        }
    }

    if summary.has_failures() {
        terminal::print_warning(&format!("Batch finished with failures: {summary}"));
    } else {
        terminal::print_success(&format!("Batch finished: {summary}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidbatch_core::config::BatchConfigBuilder;

    #[test]
    fn test_build_notifier_prefers_cli_topic() {
        let config = BatchConfigBuilder::new()
            .input_mask("*.mov")
            .ntfy_topic("https://ntfy.sh/from-config")
            .build();

        let notifier = build_notifier(Some("https://ntfy.sh/from-cli"), &config).unwrap();
        assert_eq!(notifier.topic(), "from-cli");

        let notifier = build_notifier(None, &config).unwrap();
        assert_eq!(notifier.topic(), "from-config");
    }

    #[test]
    fn test_build_notifier_invalid_or_absent() {
        let config = BatchConfigBuilder::new().input_mask("*.mov").build();
        assert!(build_notifier(None, &config).is_none());
        assert!(build_notifier(Some("not a url"), &config).is_none());
    }
}
