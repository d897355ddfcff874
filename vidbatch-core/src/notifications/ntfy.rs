// ============================================================================
// vidbatch-core/src/notifications/ntfy.rs
// ============================================================================
//
// NTFY IMPLEMENTATION: Notifier Backed by ntfy.sh
//
// Sends notifications to an ntfy topic URL such as https://ntfy.sh/encodes
// using the blocking dispatcher of the ntfy crate.

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

use super::abstraction::{Notification, Notifier};

// ---- External crate imports ----
use ntfy::DispatcherBuilder;
use ntfy::payload::{Payload, Priority as NtfyPriority};

// ============================================================================
// NTFY NOTIFIER
// ============================================================================

/// Sends notifications to an ntfy server.
///
/// # Examples
///
/// ```rust,no_run
/// use vidbatch_core::notifications::{Notification, Notifier, NtfyNotifier};
/// use vidbatch_core::summary::RunSummary;
///
/// let notifier = NtfyNotifier::new("https://ntfy.sh/your_topic").unwrap();
/// notifier
///     .notify(&Notification::RunComplete {
///         summary: RunSummary::new(0),
///         hostname: "my-computer".to_string(),
///     })
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct NtfyNotifier {
    /// Server base URL, e.g. `https://ntfy.sh`
    base_url: String,
    topic: String,
}

impl NtfyNotifier {
    /// Creates a notifier for a full topic URL.
    ///
    /// # Returns
    ///
    /// * `Ok(NtfyNotifier)` - A new notifier
    /// * `Err(CoreError::NotificationError)` - If the URL has no scheme, host or topic
    pub fn new(topic_url: &str) -> CoreResult<Self> {
        let (scheme, after_scheme) = topic_url.split_once("://").ok_or_else(|| {
            CoreError::NotificationError(format!(
                "Invalid ntfy topic URL '{topic_url}': must start with http:// or https://"
            ))
        })?;

        if scheme != "https" && scheme != "http" {
            return Err(CoreError::NotificationError(format!(
                "Invalid ntfy topic URL '{topic_url}': unsupported scheme '{scheme}'"
            )));
        }

        let (host, topic) = after_scheme.split_once('/').unwrap_or((after_scheme, ""));

        if host.is_empty() {
            return Err(CoreError::NotificationError(format!(
                "URL '{topic_url}' must have a non-empty host"
            )));
        }

        let topic = topic.trim_end_matches('/');
        if topic.is_empty() {
            return Err(CoreError::NotificationError(format!(
                "URL '{topic_url}' is missing topic path"
            )));
        }

        Ok(Self {
            base_url: format!("{scheme}://{host}"),
            topic: topic.to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl Notifier for NtfyNotifier {
    fn notify(&self, notification: &Notification) -> CoreResult<()> {
        let dispatcher = DispatcherBuilder::new(&self.base_url)
            .build_blocking()
            .map_err(|e| {
                CoreError::NotificationError(format!(
                    "Failed to build ntfy dispatcher for {}: {e}",
                    self.base_url
                ))
            })?;

        let payload = Payload::new(&self.topic)
            .message(notification.message())
            .title(notification.title())
            .priority(map_priority(notification.priority()))
            .tags(notification.tags());

        dispatcher.send(&payload).map_err(|e| {
            CoreError::NotificationError(format!(
                "Failed to send ntfy notification to {}/{}: {e}",
                self.base_url, self.topic
            ))
        })?;

        log::debug!("Sent ntfy notification: {}", notification.title());
        Ok(())
    }
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Maps a numeric priority (1-5) to the ntfy priority, defaulting out of range.
fn map_priority(p: u8) -> NtfyPriority {
    match p {
        1 => NtfyPriority::Min,
        2 => NtfyPriority::Low,
        4 => NtfyPriority::High,
        5 => NtfyPriority::Max,
        _ => NtfyPriority::Default,
    }
}
