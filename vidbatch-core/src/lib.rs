//! Core library for sequential batch transcoding through an external encoder.
//!
//! This crate provides candidate discovery, output geometry estimation,
//! filter chain and codec argument construction, hardware decode negotiation,
//! per-file execution with skip and overwrite handling, and stream-copy
//! concatenation of the successful outputs.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use vidbatch_core::config::BatchConfigBuilder;
//! use vidbatch_core::external::SidecarEncoder;
//! use vidbatch_core::notifications::NtfyNotifier;
//! use vidbatch_core::{find_candidate_files, process_batch};
//!
//! let config = BatchConfigBuilder::new()
//!     .input_mask("/path/to/input/*.mov")
//!     .output_dir("/path/to/output")
//!     .video_codec("hevc_nvenc")
//!     .quality(24)
//!     .scale("scale=1920:-1")
//!     .denoise(true)
//!     .concat("joined.mp4")
//!     .build();
//! config.validate().unwrap();
//!
//! let encoder = SidecarEncoder::new(&config.encoder_path);
//! let files = find_candidate_files(&config.input_mask).unwrap();
//! let notifier = NtfyNotifier::new("https://ntfy.sh/my-topic").unwrap();
//!
//! let report = process_batch(&encoder, Some(&notifier), &config, &files).unwrap();
//! println!("{}", report.summary);
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod hardware_decode;
pub mod notifications;
pub mod processing;
pub mod progress;
pub mod summary;
pub mod terminal;
pub mod utils;

// Re-exports for public API
pub use config::{BatchConfig, BatchConfigBuilder};
pub use discovery::find_candidate_files;
pub use error::{CoreError, CoreResult};
pub use external::{Diagnostics, Encoder, EncoderJob, SidecarEncoder};
pub use hardware_decode::HardwareDecoding;
pub use notifications::{Notification, Notifier, NtfyNotifier};
pub use processing::{EncodePlan, FileJob, JobStatus, PreparedBatch, RunReport, process_batch};
pub use summary::{ConcatStatus, RunSummary};
pub use utils::format_duration;
