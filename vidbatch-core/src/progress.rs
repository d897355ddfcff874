// ============================================================================
// vidbatch-core/src/progress.rs
// ============================================================================
//
// PROGRESS: Per-Invocation Encoder Spinner
//
// A single indicatif spinner is shown while an encoder invocation runs. The
// encoder reports elapsed media time and speed, not a total, so a spinner is
// used instead of a bar. Nothing is drawn when stderr is not a terminal.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use std::io::IsTerminal;
use std::time::Duration;

/// Spinner tracking one running encoder job.
#[derive(Debug)]
pub struct EncodeSpinner {
    bar: ProgressBar,
    label: String,
}

impl EncodeSpinner {
    /// Starts a spinner labelled with the job being run.
    #[must_use]
    pub fn start(label: impl Into<String>) -> Self {
        let label = label.into();
        let bar = ProgressBar::new_spinner();

        if std::io::stderr().is_terminal() {
            if let Ok(style) = ProgressStyle::default_spinner()
                .template("  {spinner} {msg} [{elapsed_precise}]")
            {
                bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
            }
            bar.enable_steady_tick(Duration::from_millis(120));
        } else {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }

        bar.set_message(label.clone());
        Self { bar, label }
    }

    /// Updates the message with the encoder's current position.
    pub fn update(&self, media_time: &str, speed: f32) {
        self.bar
            .set_message(format!("{} - {} @ {:.2}x", self.label, media_time, speed));
    }

    /// Removes the spinner from the terminal.
    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}
