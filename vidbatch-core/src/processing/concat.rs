// ============================================================================
// vidbatch-core/src/processing/concat.rs
// ============================================================================
//
// CONCATENATION: Manifest and Stream-Copy Join of Successful Outputs
//
// Successful outputs are appended to a ConcatManifest in the order they
// finished. After the batch, the manifest is written in concat demuxer syntax
// and the encoder joins the files with stream copy. Concatenation never
// re-encodes and never retries; its failure does not affect any file result.

use crate::config::BatchConfig;
use crate::error::CoreResult;
use crate::external::{Encoder, EncoderJob};
use crate::summary::ConcatStatus;

use serde::Serialize;

use std::fs;
use std::path::{Path, PathBuf};

/// Scratch manifest file written inside the output directory.
pub const MANIFEST_FILE_NAME: &str = ".vidbatch-concat.txt";

/// Ordered, append-only list of outputs to join.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConcatManifest {
    entries: Vec<PathBuf>,
}

impl ConcatManifest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an output. Entries are never reordered or deduplicated.
    pub fn push(&mut self, path: PathBuf) {
        self.entries.push(path);
    }

    #[must_use]
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the manifest in concat demuxer syntax, one `file '...'` line
    /// per entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vidbatch_core::processing::ConcatManifest;
    ///
    /// let mut manifest = ConcatManifest::new();
    /// manifest.push("/out/a.mp4".into());
    /// manifest.push("/out/it's.mp4".into());
    ///
    /// assert_eq!(manifest.render(), "file '/out/a.mp4'\nfile '/out/it'\\''s.mp4'\n");
    /// ```
    #[must_use]
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|path| format!("file '{}'\n", escape_path(path)))
            .collect()
    }

    /// Writes the rendered manifest to `path`.
    pub fn write_to(&self, path: &Path) -> CoreResult<()> {
        fs::write(path, self.render())?;
        log::debug!(
            "Wrote concat manifest with {} entries to {}",
            self.len(),
            path.display()
        );
        Ok(())
    }
}

/// Quotes a path for the concat demuxer: `'` becomes `'\''`.
fn escape_path(path: &Path) -> String {
    path.to_string_lossy().replace('\'', r"'\''")
}

/// Location of the manifest scratch file for a run.
#[must_use]
pub fn manifest_path(output_dir: &Path) -> PathBuf {
    output_dir.join(MANIFEST_FILE_NAME)
}

/// Removes a manifest left behind by an earlier run.
pub fn remove_stale_manifest(output_dir: &Path) -> CoreResult<()> {
    let path = manifest_path(output_dir);
    match fs::remove_file(&path) {
        Ok(()) => {
            log::debug!("Removed stale concat manifest {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Joins the successful outputs of a run.
///
/// # Returns
///
/// * `ConcatStatus::NotApplicable` - Concatenation is disabled
/// * `ConcatStatus::Skipped` - Nothing succeeded, the encoder is not invoked
/// * `ConcatStatus::Failed` - The joined output would overwrite one of its
///   inputs; the encoder is not invoked
/// * `ConcatStatus::Succeeded` / `ConcatStatus::Failed` - Encoder outcome
pub fn run_concat<E: Encoder + ?Sized>(
    encoder: &E,
    config: &BatchConfig,
    output_dir: &Path,
    manifest: &ConcatManifest,
    succeeded: usize,
) -> ConcatStatus {
    if !config.concat.enabled {
        return ConcatStatus::NotApplicable;
    }

    if succeeded == 0 || manifest.is_empty() {
        log::info!("No successful outputs; skipping concatenation");
        return ConcatStatus::Skipped;
    }

    let output = output_dir.join(&config.concat.output_name);
    if manifest.entries().contains(&output) {
        log::error!(
            "Concat output {} is also one of its inputs; not joining",
            output.display()
        );
        return ConcatStatus::Failed;
    }

    let manifest_file = manifest_path(output_dir);
    if let Err(e) = manifest.write_to(&manifest_file) {
        log::error!("Failed to write concat manifest {}: {e}", manifest_file.display());
        return ConcatStatus::Failed;
    }

    let job = EncoderJob::Concat {
        manifest: manifest_file,
        output,
    };

    log::info!(
        "Concatenating {} file(s) into {}",
        manifest.len(),
        job.output().display()
    );

    match encoder.run(&job) {
        Ok(diagnostics) => {
            for warning in &diagnostics.warnings {
                log::debug!("concat: {warning}");
            }
            ConcatStatus::Succeeded
        }
        Err(e) => {
            log::error!("Concatenation failed: {e}");
            ConcatStatus::Failed
        }
    }
}
