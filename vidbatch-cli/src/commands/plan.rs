//! Implementation of the 'plan' subcommand.
//!
//! Derives the encode plan exactly as `encode` would and prints it together
//! with the input to output mapping. Nothing is encoded and the output
//! directory is not touched.

use crate::cli::PlanArgs;
use crate::error::CliResult;

use vidbatch_core::config::BatchConfig;
use vidbatch_core::processing::{PlanReport, check_output_paths, output_path_for};
use vidbatch_core::terminal;
use vidbatch_core::{EncodePlan, Encoder, HardwareDecoding, SidecarEncoder, find_candidate_files};

use serde_json::json;
use std::path::PathBuf;

use log::debug;

/// One candidate and where `encode` would write it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Whether `encode` would skip it
    pub skip: bool,
}

/// Hardware decoding as `encode` would negotiate it.
///
/// The encoder is only queried for its decode methods, and a missing encoder
/// means no hardware decoding.
pub fn detect_hardware<E: Encoder + ?Sized>(
    encoder: &E,
    config: &BatchConfig,
) -> HardwareDecoding {
    if !config.hwaccel.enabled {
        return HardwareDecoding::unavailable(&config.hwaccel.method);
    }
    match encoder.verify() {
        Ok(()) => HardwareDecoding::detect(encoder, &config.hwaccel),
        Err(e) => {
            debug!("Skipping hardware decode detection: {e}");
            HardwareDecoding::unavailable(&config.hwaccel.method)
        }
    }
}

/// Maps candidates to their outputs.
pub fn plan_files(config: &BatchConfig, candidates: &[PathBuf]) -> Vec<PlannedFile> {
    candidates
        .iter()
        .map(|input| {
            let output = output_path_for(input, &config.output_dir, config.extension());
            let skip = output.exists() && !config.overwrite_existing;
            PlannedFile {
                input: input.clone(),
                output,
                skip,
            }
        })
        .collect()
}

/// Main entry point for the plan command.
pub fn run_plan(args: &PlanArgs, config: &BatchConfig) -> CliResult<()> {
    let encoder = SidecarEncoder::new(&config.encoder_path);
    let candidates = find_candidate_files(&config.input_mask)?;
    check_output_paths(config, &config.output_dir, &candidates)?;

    let hardware = detect_hardware(&encoder, config);
    let plan = EncodePlan::new(config, &hardware);
    let report = PlanReport::from(&plan);
    let files = plan_files(config, &candidates);

    if args.json {
        let files: Vec<_> = files
            .iter()
            .map(|f| {
                json!({
                    "input": f.input,
                    "output": f.output,
                    "skip": f.skip,
                })
            })
            .collect();
        let concat_output = config
            .concat
            .enabled
            .then(|| config.output_dir.join(&config.concat.output_name));
        let document = json!({
            "plan": report,
            "files": files,
            "concat_output": concat_output,
        });
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    print_plan(config, &report, &files);
    Ok(())
}

fn print_plan(config: &BatchConfig, report: &PlanReport, files: &[PlannedFile]) {
    let dimension = match (report.estimated_width, report.estimated_height) {
        (None, None) => "unknown".to_string(),
        (w, h) => format!(
            "{}x{}",
            w.map_or("?".to_string(), |v| v.to_string()),
            h.map_or("?".to_string(), |v| v.to_string())
        ),
    };
    let profile = report
        .profile_upper_bound
        .map_or("unbounded".to_string(), |bound| format!("up to {bound}"));

    terminal::print_section("ENCODE PLAN");
    terminal::print_status("Output size", &dimension, false);
    terminal::print_status("Filter profile", &profile, false);
    terminal::print_status(
        "Filter chain",
        report.filter_chain.as_deref().unwrap_or("none"),
        false,
    );
    let codec = if report.hardware_encode {
        format!("{} (hardware)", report.codec)
    } else {
        report.codec.clone()
    };
    terminal::print_status("Codec", &codec, true);
    terminal::print_status("Codec args", &report.codec_args.join(" "), false);
    terminal::print_status(
        "Hwaccel args",
        &if report.hwaccel_args.is_empty() {
            "none".to_string()
        } else {
            report.hwaccel_args.join(" ")
        },
        false,
    );
    terminal::print_status("Audio args", &report.audio_args.join(" "), false);
    if config.concat.enabled {
        terminal::print_status(
            "Concat output",
            &config
                .output_dir
                .join(&config.concat.output_name)
                .display()
                .to_string(),
            false,
        );
    }

    terminal::print_section("FILES");
    for file in files {
        let suffix = if file.skip { " (exists, skip)" } else { "" };
        terminal::print_sub_item(&format!(
            "{} -> {}{suffix}",
            file.input.display(),
            file.output.display()
        ));
    }
}
