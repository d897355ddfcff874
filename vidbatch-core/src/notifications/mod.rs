//! Notification system for batch status updates.
//!
//! Per-file failures and run completion are pushed through a [`Notifier`];
//! [`NtfyNotifier`] delivers them to an ntfy.sh topic.
mod abstraction;
mod ntfy;

pub use abstraction::{Notification, Notifier, notify_or_warn};
pub use ntfy::NtfyNotifier;
