//! Lint run stamp for incremental linting.
//!
//! Records the wall-clock time of the previous completed lint run in
//! `.lint-stamp.json` inside the destination directory. The next run
//! restricts the file set to paths modified after the stamp, so unchanged
//! files are not re-linted across repeated invocations (e.g. during a watch
//! session).

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Current stamp format version.
const STAMP_VERSION: u32 = 1;

/// Default stamp filename.
pub const STAMP_FILENAME: &str = ".lint-stamp.json";

/// Error during stamp operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StampError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Version mismatch
    #[error("Lint stamp version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Timestamp of the previous completed lint run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintStamp {
    /// Stamp format version
    pub version: u32,
    /// Milliseconds since the Unix epoch at completion of the run
    pub last_run_ms: u64,
}

impl LintStamp {
    /// Create a stamp for the current instant.
    pub fn now() -> Self {
        Self { version: STAMP_VERSION, last_run_ms: now_ms() }
    }

    /// Load a stamp from a file.
    ///
    /// Returns `Ok(None)` if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Option<Self>, StampError> {
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let stamp: LintStamp = serde_json::from_reader(reader)?;

        if stamp.version != STAMP_VERSION {
            return Err(StampError::VersionMismatch {
                expected: STAMP_VERSION,
                found: stamp.version,
            });
        }

        Ok(Some(stamp))
    }

    /// Load a stamp from the default location in the destination directory.
    pub fn load_from_dir(dest_dir: &Path) -> Result<Option<Self>, StampError> {
        Self::load(&dest_dir.join(STAMP_FILENAME))
    }

    /// Save the stamp to a file.
    pub fn save(&self, path: &Path) -> Result<(), StampError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;

        Ok(())
    }

    /// Save the stamp to the default location in the destination directory.
    pub fn save_to_dir(&self, dest_dir: &Path) -> Result<(), StampError> {
        self.save(&dest_dir.join(STAMP_FILENAME))
    }
}

/// Current time in milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
