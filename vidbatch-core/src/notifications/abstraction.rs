// ============================================================================
// vidbatch-core/src/notifications/abstraction.rs
// ============================================================================
//
// NOTIFICATION ABSTRACTION: Notification Types and the Notifier Trait
//
// The batch pipeline reports two events: a file that failed to encode and the
// end of a run. Backends implement Notifier; failures to deliver are reported
// to the caller, which only logs them.

// ---- Internal crate imports ----
use crate::error::CoreResult;
use crate::summary::RunSummary;

// ---- Standard library imports ----
use std::path::PathBuf;

// ============================================================================
// NOTIFICATION TYPES
// ============================================================================

/// Events that can be pushed to a notification backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A single file failed to encode; the batch continues
    FileFailed {
        /// Path to the input file
        input_path: PathBuf,
        /// Error message
        message: String,
        /// Hostname of the machine performing the encoding
        hostname: String,
    },

    /// The batch run finished
    RunComplete {
        summary: RunSummary,
        /// Hostname of the machine performing the encoding
        hostname: String,
    },
}

impl Notification {
    /// Gets the title for this notification.
    #[must_use]
    pub fn title(&self) -> String {
        match self {
            Self::FileFailed { .. } => "vidbatch: Encode Failed".to_string(),
            Self::RunComplete { summary, .. } if summary.has_failures() => {
                "vidbatch: Batch Finished With Errors".to_string()
            }
            Self::RunComplete { .. } => "vidbatch: Batch Complete".to_string(),
        }
    }

    /// Gets the message body for this notification.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::FileFailed {
                input_path,
                message,
                hostname,
            } => {
                let filename = input_path
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_else(|| input_path.to_string_lossy().to_string());
                format!("[{hostname}]: Error encoding {filename}: {message}")
            }
            Self::RunComplete { summary, hostname } => format!(
                "[{hostname}]: {} of {} file(s) encoded, {} skipped, {} failed. Concat: {}.",
                summary.succeeded,
                summary.total,
                summary.skipped,
                summary.failed,
                summary.concat_status
            ),
        }
    }

    /// Gets the priority level (1-5, with 5 being highest).
    #[must_use]
    pub fn priority(&self) -> u8 {
        match self {
            Self::FileFailed { .. } => 5,
            Self::RunComplete { summary, .. } if summary.has_failures() => 4,
            Self::RunComplete { .. } => 3,
        }
    }

    /// Gets the tags attached to this notification.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        let tag = match self {
            Self::FileFailed { .. } => "error",
            Self::RunComplete { summary, .. } if summary.has_failures() => "warning",
            Self::RunComplete { .. } => "complete",
        };
        vec!["vidbatch".to_string(), tag.to_string()]
    }
}

// ============================================================================
// NOTIFIER
// ============================================================================

/// Trait for sending notifications.
pub trait Notifier {
    /// Sends a notification.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the notification was sent successfully
    /// * `Err(CoreError::NotificationError)` - If delivery failed
    fn notify(&self, notification: &Notification) -> CoreResult<()>;
}

/// Sends a notification, logging instead of propagating any failure.
pub fn notify_or_warn(notifier: Option<&dyn Notifier>, notification: &Notification) {
    if let Some(notifier) = notifier {
        if let Err(e) = notifier.notify(notification) {
            log::warn!("Failed to send notification '{}': {e}", notification.title());
        }
    }
}
