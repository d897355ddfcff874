// ============================================================================
// vidbatch-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Core Error Types
//
// A single error enum covers every failure the core library can report.
// Precondition failures (configuration, encoder lookup, discovery, output
// directory) abort a run; encoder failures are recorded per job by the batch
// executor and never escape it.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors produced by the vidbatch core library.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read configuration file '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Encoder executable '{0}' not found")]
    DependencyNotFound(String),

    #[error("Failed to start '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed to wait for '{0}': {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("'{command}' exited with {status}: {message}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        message: String,
    },

    #[error("Invalid input mask '{mask}': {message}")]
    InvalidInputMask { mask: String, message: String },

    #[error("No input files matched '{0}'")]
    NoFilesFound(String),

    #[error("Failed to create output directory '{path}': {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{first}' and '{second}' would both be written to '{output}'")]
    OutputCollision {
        output: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Concat output '{output}' is also the encoded output of '{input}'")]
    ConcatOutputCollision { output: PathBuf, input: PathBuf },

    #[error("Notification error: {0}")]
    NotificationError(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type used throughout vidbatch-core.
pub type CoreResult<T> = Result<T, CoreError>;

/// Builds a [`CoreError::CommandFailed`] from an exit status and message.
pub fn command_failed_error(
    command: impl Into<String>,
    status: ExitStatus,
    message: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        command: command.into(),
        status,
        message: message.into(),
    }
}
