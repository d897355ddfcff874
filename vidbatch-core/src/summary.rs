// ============================================================================
// vidbatch-core/src/summary.rs
// ============================================================================
//
// RUN SUMMARY: Counters and Concat Outcome for One Run
//
// The batch stage fills in the per-file counters and the concat stage records
// its outcome. The value is owned by the run and returned to the caller; there
// is no shared counter state.

use serde::Serialize;

use std::fmt;

/// Outcome of the final concatenation step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcatStatus {
    /// Concatenation is disabled
    #[default]
    NotApplicable,
    /// Enabled, but no file was encoded successfully
    Skipped,
    Succeeded,
    Failed,
}

impl fmt::Display for ConcatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotApplicable => "not applicable",
            Self::Skipped => "skipped",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        })
    }
}

/// Counters for one batch run.
///
/// `total` is fixed when candidates are enumerated; every job then lands in
/// exactly one of `succeeded`, `skipped` or `failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub concat_status: ConcatStatus,
}

impl RunSummary {
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Number of jobs that reached a terminal state.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }

    /// True when the run finished but a file or the concat step failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.concat_status == ConcatStatus::Failed
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} total, {} succeeded, {} skipped, {} failed, concat {}",
            self.total, self.succeeded, self.skipped, self.failed, self.concat_status
        )
    }
}
