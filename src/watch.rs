//! Watch mode for automatic rebuilds on file changes
//!
//! Watches the directories underlying the configured watch globs and invokes
//! the composed styles task once per delivered (debounced) change batch.
//! Runs until the process is terminated.

use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;
use thiserror::Error;

use crate::config::WatchConfig;
use crate::task::discovery::glob_base_dir;

/// Error during watch mode
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WatchError {
    /// Invalid watch glob pattern
    #[error("Invalid watch pattern '{pattern}': {source}")]
    Pattern {
        /// The offending pattern
        pattern: String,
        /// Underlying parse error
        source: glob::PatternError,
    },
    /// Failed to initialize file watcher
    #[error("Failed to initialize file watcher: {0}")]
    WatcherInit(notify::Error),
    /// Failed to add watch path
    #[error("Failed to watch path: {0}")]
    WatchPath(notify::Error),
    /// Channel receive error
    #[error("Watch channel error: {0}")]
    Channel(String),
    /// No watch glob resolves to an existing directory
    #[error("No existing directory to watch (checked {0} pattern(s))")]
    NoWatchPaths(usize),
}

/// Watch the given globs and invoke `on_change` once per change batch.
///
/// `on_change` receives the changed paths; it is also invoked once with an
/// empty slice before watching starts, so a session always begins from a
/// fresh build. This function blocks until the process is terminated.
pub fn watch_styles<F>(
    project_root: &Path,
    patterns: &[String],
    config: &WatchConfig,
    mut on_change: F,
) -> Result<(), WatchError>
where
    F: FnMut(&[PathBuf]),
{
    let matchers = compile_patterns(project_root, patterns)?;
    let roots = watch_roots(project_root, patterns);
    if roots.is_empty() {
        return Err(WatchError::NoWatchPaths(patterns.len()));
    }

    let (tx, rx) = channel();

    let debounce = Duration::from_millis(u64::from(config.debounce_ms));
    let mut debouncer = new_debouncer(debounce, tx).map_err(WatchError::WatcherInit)?;

    for root in &roots {
        debouncer
            .watcher()
            .watch(root, RecursiveMode::Recursive)
            .map_err(WatchError::WatchPath)?;
    }

    // Initial run
    if config.clear_screen {
        clear_screen();
    }
    println!("[{}] Building...", timestamp());
    on_change(&[]);
    print_watching(&roots);

    // Watch loop
    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let changed: Vec<PathBuf> = events
                    .iter()
                    .filter(|e| {
                        matches!(e.kind, DebouncedEventKind::Any)
                            && matches_any(&matchers, &e.path)
                    })
                    .map(|e| e.path.clone())
                    .collect();

                if !changed.is_empty() {
                    for path in &changed {
                        if let Some(name) = path.file_name() {
                            println!("[{}] Changed: {}", timestamp(), name.to_string_lossy());
                        }
                    }

                    if config.clear_screen {
                        clear_screen();
                    }

                    println!("[{}] Building...", timestamp());
                    on_change(&changed);
                    print_watching(&roots);
                }
            }
            Ok(Err(error)) => {
                // Watch error (non-fatal) - log but continue watching
                eprintln!("[{}] Watch error: {:?}", timestamp(), error);
                eprintln!("[{}] Continuing to watch...", timestamp());
            }
            Err(e) => {
                return Err(WatchError::Channel(e.to_string()));
            }
        }
    }
}

/// Compile the watch globs into matchers anchored at the project root.
fn compile_patterns(
    project_root: &Path,
    patterns: &[String],
) -> Result<Vec<glob::Pattern>, WatchError> {
    patterns
        .iter()
        .map(|pattern| {
            let anchored = if Path::new(pattern).is_absolute() {
                pattern.clone()
            } else {
                project_root.join(pattern).to_string_lossy().into_owned()
            };
            glob::Pattern::new(&anchored)
                .map_err(|source| WatchError::Pattern { pattern: pattern.clone(), source })
        })
        .collect()
}

/// Check whether a path matches any of the compiled watch patterns.
fn matches_any(matchers: &[glob::Pattern], path: &Path) -> bool {
    matchers.iter().any(|m| m.matches_path(path))
}

/// Derive the existing directories underlying the watch globs.
fn watch_roots(project_root: &Path, patterns: &[String]) -> Vec<PathBuf> {
    let mut roots = HashSet::new();

    for pattern in patterns {
        let base = glob_base_dir(pattern);
        let resolved = if base.is_absolute() { base } else { project_root.join(base) };
        if resolved.is_dir() {
            roots.insert(resolved);
        }
    }

    let mut roots: Vec<_> = roots.into_iter().collect();
    roots.sort();
    roots
}

fn print_watching(roots: &[PathBuf]) {
    for root in roots {
        println!("[{}] Watching {} for changes...", timestamp(), root.display());
    }
}

/// Clear the terminal screen
fn clear_screen() {
    // ANSI escape code to clear screen and move cursor to top-left
    print!("\x1B[2J\x1B[1;1H");
}

/// Get current timestamp for logging
fn timestamp() -> String {
    use std::time::SystemTime;
    let now = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
    let secs = now.as_secs() % 86400; // seconds since midnight
    let hours = (secs / 3600) % 24;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_compile_patterns_and_match() {
        let root = Path::new("/project");
        let matchers =
            compile_patterns(root, &["styles/**/*.scss".to_string()]).unwrap();

        assert!(matches_any(&matchers, Path::new("/project/styles/a.scss")));
        assert!(matches_any(&matchers, Path::new("/project/styles/deep/b.scss")));
        assert!(!matches_any(&matchers, Path::new("/project/styles/a.css")));
        assert!(!matches_any(&matchers, Path::new("/elsewhere/styles/a.scss")));
    }

    #[test]
    fn test_compile_patterns_invalid() {
        let result = compile_patterns(Path::new("/project"), &["[".to_string()]);
        assert!(matches!(result, Err(WatchError::Pattern { .. })));
    }

    #[test]
    fn test_watch_roots_existing_dirs_only() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("styles")).unwrap();

        let roots = watch_roots(
            temp.path(),
            &["styles/**/*.scss".to_string(), "missing/**/*.scss".to_string()],
        );

        assert_eq!(roots, vec![temp.path().join("styles")]);
    }

    #[test]
    fn test_watch_roots_deduplicates() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("styles")).unwrap();

        let roots = watch_roots(
            temp.path(),
            &["styles/**/*.scss".to_string(), "styles/*.scss".to_string()],
        );

        assert_eq!(roots.len(), 1);
    }

    #[test]
    fn test_watch_no_paths() {
        let temp = TempDir::new().unwrap();
        let result = watch_styles(
            temp.path(),
            &["missing/**/*.scss".to_string()],
            &WatchConfig::default(),
            |_| {},
        );
        assert!(matches!(result, Err(WatchError::NoWatchPaths(1))));
    }

    #[test]
    fn test_timestamp_format() {
        let ts = timestamp();
        assert_eq!(ts.len(), 8);
        assert_eq!(ts.matches(':').count(), 2);
    }
}
