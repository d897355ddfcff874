// ============================================================================
// vidbatch-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Result Type and Exit Codes
//
// The CLI reuses the core error type. Errors returned from a command are
// precondition failures; per-file and concat failures are part of the run
// summary and only change the exit code.

// ---- Internal crate imports ----
use vidbatch_core::{CoreResult, RunSummary};

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

/// The run completed and every file and the concat step succeeded or was skipped.
pub const EXIT_SUCCESS: i32 = 0;

/// The run did not start: configuration, encoder, discovery or output directory.
pub const EXIT_PRECONDITION_FAILED: i32 = 1;

/// The run completed but at least one file or the concat step failed.
pub const EXIT_RUN_FAILURES: i32 = 2;

/// Maps a finished run to the process exit code.
#[must_use]
pub fn exit_code_for(summary: &RunSummary) -> i32 {
    if summary.has_failures() {
        EXIT_RUN_FAILURES
    } else {
        EXIT_SUCCESS
    }
}
