// vidbatch-core/tests/common/mod.rs
//
// Test doubles shared by the integration tests.

#![allow(dead_code)]

use vidbatch_core::error::{CoreError, CoreResult};
use vidbatch_core::external::{Diagnostics, Encoder, EncoderJob};
use vidbatch_core::notifications::{Notification, Notifier};

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Encoder double that records every job and writes a placeholder output.
#[derive(Default)]
pub struct RecordingEncoder {
    jobs: Mutex<Vec<EncoderJob>>,
    /// Input file names whose transcode fails
    failing_inputs: HashSet<String>,
    fail_concat: bool,
    missing: bool,
    hwaccels: Vec<String>,
}

impl RecordingEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, file_name: &str) -> Self {
        self.failing_inputs.insert(file_name.to_string());
        self
    }

    pub fn failing_concat(mut self) -> Self {
        self.fail_concat = true;
        self
    }

    /// Behaves like an encoder executable that cannot be found.
    pub fn missing(mut self) -> Self {
        self.missing = true;
        self
    }

    pub fn with_hwaccels(mut self, methods: &[&str]) -> Self {
        self.hwaccels = methods.iter().map(|m| (*m).to_string()).collect();
        self
    }

    pub fn jobs(&self) -> Vec<EncoderJob> {
        self.jobs.lock().unwrap().clone()
    }

    pub fn transcode_jobs(&self) -> Vec<EncoderJob> {
        self.jobs()
            .into_iter()
            .filter(|job| matches!(job, EncoderJob::Transcode { .. }))
            .collect()
    }

    pub fn concat_jobs(&self) -> Vec<EncoderJob> {
        self.jobs()
            .into_iter()
            .filter(|job| matches!(job, EncoderJob::Concat { .. }))
            .collect()
    }

    /// File names of the transcoded inputs, in invocation order.
    pub fn transcoded_inputs(&self) -> Vec<String> {
        self.transcode_jobs()
            .iter()
            .filter_map(|job| match job {
                EncoderJob::Transcode { input, .. } => Some(file_name(input)),
                EncoderJob::Concat { .. } => None,
            })
            .collect()
    }
}

impl Encoder for RecordingEncoder {
    fn verify(&self) -> CoreResult<()> {
        if self.missing {
            Err(CoreError::DependencyNotFound("recording-encoder".to_string()))
        } else {
            Ok(())
        }
    }

    fn hwaccel_methods(&self) -> CoreResult<Vec<String>> {
        Ok(self.hwaccels.clone())
    }

    fn run(&self, job: &EncoderJob) -> CoreResult<Diagnostics> {
        self.jobs.lock().unwrap().push(job.clone());

        let fails = match job {
            EncoderJob::Transcode { input, .. } => self.failing_inputs.contains(&file_name(input)),
            EncoderJob::Concat { .. } => self.fail_concat,
        };
        if fails {
            return Err(CoreError::Config(format!("simulated {} failure", job.label())));
        }

        fs::write(job.output(), b"encoded")?;
        Ok(Diagnostics::default())
    }
}

/// Notifier double that keeps every notification.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) -> CoreResult<()> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Notifier double whose every delivery fails.
pub struct UnreachableNotifier;

impl Notifier for UnreachableNotifier {
    fn notify(&self, _notification: &Notification) -> CoreResult<()> {
        Err(CoreError::NotificationError("connection refused".to_string()))
    }
}

// Helper to create a dummy file with some content
pub fn create_dummy_file(dir: &Path, filename: &str) -> PathBuf {
    let file_path = dir.join(filename);
    let mut file = File::create(&file_path).expect("Failed to create dummy file");
    file.write_all(b"dummy content")
        .expect("Failed to write dummy content");
    file_path
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
