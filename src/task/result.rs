//! Build result types.
//!
//! Contains types for representing the outcome of build operations.

use std::path::PathBuf;
use std::time::Duration;

/// Status of a single source file in a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// Build succeeded
    Success,
    /// Build failed with error
    Failed(String),
}

impl FileStatus {
    /// Check if the status indicates success.
    pub fn is_success(&self) -> bool {
        matches!(self, FileStatus::Success)
    }

    /// Check if the status indicates failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, FileStatus::Failed(_))
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStatus::Success => write!(f, "success"),
            FileStatus::Failed(err) => write!(f, "failed: {}", err),
        }
    }
}

/// Result of building a single source file.
#[derive(Debug, Clone)]
pub struct FileResult {
    /// Source file that was built
    pub source: PathBuf,
    /// Build status
    pub status: FileStatus,
    /// Output files produced (CSS and source map)
    pub outputs: Vec<PathBuf>,
    /// Build duration
    pub duration: Duration,
}

impl FileResult {
    /// Create a successful result.
    pub fn success(source: PathBuf, outputs: Vec<PathBuf>, duration: Duration) -> Self {
        Self { source, status: FileStatus::Success, outputs, duration }
    }

    /// Create a failed result.
    pub fn failed(source: PathBuf, error: String, duration: Duration) -> Self {
        Self { source, status: FileStatus::Failed(error), outputs: vec![], duration }
    }

    /// Check if this result is successful.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Result of a complete build run.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Results for each source file
    pub files: Vec<FileResult>,
    /// Total build duration
    pub total_duration: Duration,
}

impl BuildReport {
    /// Create a new empty build report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file result.
    pub fn add_result(&mut self, result: FileResult) {
        self.files.push(result);
    }

    /// Get the number of successfully built files.
    pub fn success_count(&self) -> usize {
        self.files.iter().filter(|r| r.status.is_success()).count()
    }

    /// Get the number of failed files.
    pub fn failed_count(&self) -> usize {
        self.files.iter().filter(|r| r.status.is_failure()).count()
    }

    /// Check if the overall build succeeded (no failures).
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    /// Get all outputs produced.
    pub fn all_outputs(&self) -> Vec<&PathBuf> {
        self.files.iter().flat_map(|r| r.outputs.iter()).collect()
    }

    /// Get failed file results.
    pub fn failures(&self) -> Vec<&FileResult> {
        self.files.iter().filter(|r| r.status.is_failure()).collect()
    }

    /// Format a summary of the build report.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        let success = self.success_count();
        let failed = self.failed_count();
        let total = self.files.len();

        if failed > 0 {
            lines.push(format!(
                "Build failed: {} succeeded, {} failed ({} total)",
                success, failed, total
            ));
            for file in self.failures() {
                lines.push(format!("  - {}: {}", file.source.display(), file.status));
            }
        } else {
            lines.push(format!(
                "Build succeeded: {} compiled ({} total) in {:?}",
                success, total, self.total_duration
            ));
        }

        lines.join("\n")
    }
}
