// ============================================================================
// vidbatch-cli/src/main.rs
// ============================================================================
//
// VIDBATCH CLI: Main Entry Point
//
// Parses the command line, resolves the configuration, sets up logging and
// dispatches to the selected subcommand.
//
// Exit codes:
// - 0: the run completed without file or concat failures
// - 1: a precondition failed and nothing was encoded
// - 2: the run completed but a file or the concat step failed

use clap::Parser;
use std::process;

use vidbatch_cli::error::{EXIT_PRECONDITION_FAILED, EXIT_SUCCESS, exit_code_for};
use vidbatch_cli::logging::{self, RunLogFile};
use vidbatch_cli::{Cli, Commands, EncodeArgs, PlanArgs, resolve_config, run_encode, run_plan};
use vidbatch_core::{CoreError, terminal};

fn main() {
    let cli = Cli::parse();

    let exit_code = match &cli.command {
        Commands::Encode(args) => encode_main(args, cli.verbose),
        Commands::Plan(args) => plan_main(args, cli.verbose),
    };

    process::exit(exit_code);
}

fn encode_main(args: &EncodeArgs, verbose: bool) -> i32 {
    let config = resolve_config(&args.run);

    // The default log directory lives under the output directory, which must
    // not exist until the batch has passed its preconditions.
    let run_log = match &config {
        Ok(config) if !args.no_log_file => {
            let log_dir = args
                .log_dir
                .clone()
                .unwrap_or_else(|| config.output_dir.join("logs"));
            Some(RunLogFile::new(logging::run_log_path(&log_dir)))
        }
        _ => None,
    };
    start_logging(verbose, run_log.as_ref());
    if let (Some(run_log), Some(_)) = (&run_log, &args.log_dir) {
        logging::start_run_log(run_log);
    }

    match config.and_then(|config| run_encode(args, &config, run_log.as_ref())) {
        Ok(report) => exit_code_for(&report.summary),
        Err(e) => report_precondition_error(&e),
    }
}

fn plan_main(args: &PlanArgs, verbose: bool) -> i32 {
    start_logging(verbose, None);

    match resolve_config(&args.run).and_then(|config| run_plan(args, &config)) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report_precondition_error(&e),
    }
}

fn start_logging(verbose: bool, run_log: Option<&RunLogFile>) {
    if let Err(e) = logging::init_logging(verbose, run_log) {
        eprintln!("Failed to initialize logging: {e}");
    }
}

fn report_precondition_error(error: &CoreError) -> i32 {
    terminal::print_error(
        "Batch not started",
        &error.to_string(),
        vidbatch_cli::commands::suggestion_for(error),
    );
    EXIT_PRECONDITION_FAILED
}
