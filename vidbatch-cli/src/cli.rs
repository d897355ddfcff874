// vidbatch-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use vidbatch_core::config::MAX_QUALITY;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "vidbatch: Batch video transcoder",
    long_about = "Transcodes every file matched by an input mask through ffmpeg, with \
                  configurable crop, scale, denoise and sharpen stages, hardware \
                  decoding and optional concatenation of the results."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug-level logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encodes every file matched by the input mask
    Encode(EncodeArgs),

    /// Prints the derived encode plan without encoding anything
    Plan(PlanArgs),
}

/// Configuration source and overrides shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// TOML configuration file; flags below override its values
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Encoder executable (ffmpeg or compatible)
    #[arg(long, value_name = "PATH", env = "VIDBATCH_ENCODER")]
    pub encoder: Option<PathBuf>,

    /// Glob pattern selecting the input files (e.g. "input/*.mov")
    #[arg(short = 'i', long, value_name = "GLOB")]
    pub input_mask: Option<String>,

    /// Directory where encoded files will be saved
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Video encoder name (libx264, libx265, libsvtav1, libvpx-vp9, h264_nvenc, ...)
    #[arg(long, value_name = "NAME")]
    pub codec: Option<String>,

    /// Quality value: CRF for software encoders, CQ for NVENC
    #[arg(
        short,
        long,
        value_name = "Q",
        value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_QUALITY))
    )]
    pub quality: Option<u32>,

    /// Re-encode files whose output already exists
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    /// Disable hardware-accelerated decoding
    #[arg(long, default_value_t = false)]
    pub no_hwaccel: bool,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[command(flatten)]
    pub run: RunArgs,

    // --- Notifications ---
    /// Optional: ntfy.sh topic URL for sending notifications (e.g., https://ntfy.sh/your_topic)
    /// Can also be set via the VIDBATCH_NTFY_TOPIC environment variable.
    #[arg(long, value_name = "TOPIC_URL", env = "VIDBATCH_NTFY_TOPIC")]
    pub ntfy: Option<String>,

    // --- Reporting ---
    /// Optional: Directory for log files (defaults to OUTPUT_DIR/logs)
    #[arg(short, long, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Do not write a log file
    #[arg(long, default_value_t = false)]
    pub no_log_file: bool,

    /// Write the run report as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub summary_json: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Print the plan as JSON instead of text
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
