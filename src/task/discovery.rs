//! Source file discovery for the stylesheet tasks.
//!
//! Expands the glob patterns from the configuration into concrete file sets.
//! A pattern matching zero files is not an error.

use glob::glob;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use thiserror::Error;

/// Error during source discovery.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DiscoveryError {
    /// Invalid glob pattern
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Underlying parse error
        source: glob::PatternError,
    },
}

/// Discover files matching a set of glob patterns.
///
/// Relative patterns are resolved against `base_dir`. Results are
/// deduplicated and sorted; only stylesheet files (`.scss`, `.sass`, `.css`)
/// are returned.
pub fn discover_files(base_dir: &Path, patterns: &[String]) -> Result<Vec<PathBuf>, DiscoveryError> {
    let mut all_files = HashSet::new();

    for pattern in patterns {
        let full_pattern = if Path::new(pattern).is_absolute() {
            pattern.clone()
        } else {
            base_dir.join(pattern).to_string_lossy().into_owned()
        };

        let paths = glob(&full_pattern)
            .map_err(|source| DiscoveryError::InvalidPattern { pattern: pattern.clone(), source })?;

        for entry in paths {
            match entry {
                Ok(path) => {
                    if path.is_file() && is_stylesheet(&path) {
                        all_files.insert(path);
                    }
                }
                Err(err) => {
                    // Unreadable paths are skipped, not fatal
                    log::warn!("error reading path during discovery: {}", err);
                }
            }
        }
    }

    let mut files: Vec<_> = all_files.into_iter().collect();
    files.sort();
    Ok(files)
}

/// Discover the compile set: stylesheet files minus partials.
///
/// Sass partials (`_*.scss`) are imported by other files and never compiled
/// standalone.
pub fn compile_sources(base_dir: &Path, patterns: &[String]) -> Result<Vec<PathBuf>, DiscoveryError> {
    let files = discover_files(base_dir, patterns)?;
    Ok(files.into_iter().filter(|p| !is_partial(p)).collect())
}

/// Check if a path is a stylesheet source file.
pub fn is_stylesheet(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("scss") | Some("sass") | Some("css"))
}

/// Check if a path is a Sass partial (file name starting with `_`).
pub fn is_partial(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('_'))
        .unwrap_or(false)
}

/// Restrict a file set to paths modified after `since_ms` (milliseconds since
/// the Unix epoch).
///
/// Files whose modification time cannot be read are kept, so they are never
/// silently dropped from a lint run.
pub fn modified_since(files: Vec<PathBuf>, since_ms: u64) -> Vec<PathBuf> {
    files
        .into_iter()
        .filter(|path| match file_mtime_ms(path) {
            Some(mtime) => mtime > since_ms,
            None => true,
        })
        .collect()
}

/// Modification time of a file in milliseconds since the Unix epoch.
pub fn file_mtime_ms(path: &Path) -> Option<u64> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    let duration = modified.duration_since(UNIX_EPOCH).ok()?;
    Some(duration.as_millis() as u64)
}

/// Derive the fixed directory prefix of a glob pattern.
///
/// Returns the leading path components that contain no glob metacharacters.
/// Used by the watch task to decide which directories to observe.
pub fn glob_base_dir(pattern: &str) -> PathBuf {
    let mut base = PathBuf::new();

    for component in Path::new(pattern).components() {
        let text = component.as_os_str().to_string_lossy();
        if text.chars().any(|c| matches!(c, '*' | '?' | '[')) {
            break;
        }
        base.push(component);
    }

    // A bare file name pattern watches the current directory
    if base == Path::new(pattern) {
        if let Some(parent) = base.parent() {
            return parent.to_path_buf();
        }
    }

    base
}
