//! Candidate discovery for a batch run.
//!
//! Inputs are selected with a glob mask and returned in a stable order:
//! lexicographic by file name, ties broken by the full path. This order is the
//! processing order and therefore the concatenation order, so it must not
//! depend on how the file system happens to enumerate a directory.

use crate::error::{CoreError, CoreResult};

use std::path::{Path, PathBuf};

/// Finds the regular files matched by `input_mask`.
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - Matched files in processing order
/// * `Err(CoreError::InvalidInputMask)` - If the mask is not a valid pattern
/// * `Err(CoreError::NoFilesFound)` - If nothing matched
///
/// # Examples
///
/// ```rust,no_run
/// use vidbatch_core::find_candidate_files;
///
/// match find_candidate_files("input/*.mp4") {
///     Ok(files) => println!("Found {} candidates", files.len()),
///     Err(e) => eprintln!("Discovery failed: {e}"),
/// }
/// ```
pub fn find_candidate_files(input_mask: &str) -> CoreResult<Vec<PathBuf>> {
    let entries = glob::glob(input_mask).map_err(|e| CoreError::InvalidInputMask {
        mask: input_mask.to_string(),
        message: e.to_string(),
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                log::warn!("Skipping unreadable path while matching '{input_mask}': {e}");
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();

    if files.is_empty() {
        return Err(CoreError::NoFilesFound(input_mask.to_string()));
    }

    sort_candidates(&mut files);
    log::debug!("Input mask '{input_mask}' matched {} file(s)", files.len());
    Ok(files)
}

/// Sorts candidates into processing order.
pub fn sort_candidates(files: &mut [PathBuf]) {
    files.sort_by(|a, b| file_name_key(a).cmp(file_name_key(b)).then_with(|| a.cmp(b)));
}

fn file_name_key(path: &Path) -> &std::ffi::OsStr {
    path.file_name().unwrap_or(path.as_os_str())
}
