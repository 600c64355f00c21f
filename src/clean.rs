//! Cleanup of previously generated build output.
//!
//! Deletes every file or directory matching the configured clean globs.
//! Idempotent: paths that are already gone are skipped, so running clean
//! twice is a no-op the second time.

use crate::task::TaskContext;
use glob::glob;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error during cleanup.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CleanError {
    /// Invalid glob pattern
    #[error("Invalid clean pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Underlying parse error
        source: glob::PatternError,
    },
    /// Deletion failure other than "already absent"
    #[error("Failed to remove {path}: {source}")]
    Remove {
        /// Path that could not be removed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Delete all paths matching the configured clean globs.
///
/// Returns the list of paths that were actually removed.
pub fn clean(context: &TaskContext) -> Result<Vec<PathBuf>, CleanError> {
    let mut removed = Vec::new();

    for pattern in context.clean_globs() {
        let anchored = if Path::new(pattern).is_absolute() {
            pattern.clone()
        } else {
            context.project_root().join(pattern).to_string_lossy().into_owned()
        };

        let paths = glob(&anchored)
            .map_err(|source| CleanError::InvalidPattern { pattern: pattern.clone(), source })?;

        for entry in paths {
            let path = match entry {
                Ok(path) => path,
                Err(err) => {
                    log::warn!("error reading path during clean: {}", err);
                    continue;
                }
            };

            if remove_path(&path)? {
                if context.is_verbose() {
                    println!("Removed: {}", path.display());
                }
                removed.push(path);
            }
        }
    }

    Ok(removed)
}

/// Remove a single path, directory or file. Returns whether anything was
/// actually deleted; an already-absent path is not an error.
fn remove_path(path: &Path) -> Result<bool, CleanError> {
    let result = if path.is_dir() { fs::remove_dir_all(path) } else { fs::remove_file(path) };

    match result {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(source) => Err(CleanError::Remove { path: path.to_path_buf(), source }),
    }
}
