/// Saved session storage
///
/// The last watched session is kept in `<home>/session.json` so a later
/// `ec watch --resume` can pick up where it stopped. Reads take a shared
/// lock and writes an exclusive one, so an autosave and a concurrent
/// `ec status` never see a half-written file.
use crate::coordinator::StateSnapshot;
use crate::errors::{EarnError, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

pub const SESSION_FILE: &str = "session.json";

/// Persisted progress of one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub hourly_rate: f64,
    pub elapsed_seconds: u64,
    pub accrued_amount: f64,
    pub saved_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn from_state(state: &StateSnapshot) -> Self {
        Self {
            hourly_rate: state.hourly_rate,
            elapsed_seconds: state.elapsed_seconds,
            accrued_amount: state.accrued_amount,
            saved_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    session_file: PathBuf,
}

impl SessionStore {
    /// Create a store rooted at the earnclock home directory
    pub fn new(home: &Path) -> Result<Self> {
        if !home.exists() {
            fs::create_dir_all(home).map_err(|e| {
                EarnError::StateError(format!("Failed to create state directory: {}", e))
            })?;
        }

        Ok(Self {
            session_file: home.join(SESSION_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.session_file
    }

    /// Load the saved session, if any
    pub fn load(&self) -> Result<Option<SessionRecord>> {
        if !self.session_file.exists() {
            return Ok(None);
        }

        let file = File::open(&self.session_file)
            .map_err(|e| EarnError::StateError(format!("Failed to open session file: {}", e)))?;

        file.lock_shared()
            .map_err(|e| EarnError::StateError(format!("Failed to lock session file: {}", e)))?;

        let record: SessionRecord = serde_json::from_reader(&file).map_err(|e| {
            // Release lock before returning error
            let _ = file.unlock();
            EarnError::StateError(format!("Failed to parse session file: {}", e))
        })?;

        file.unlock()
            .map_err(|e| EarnError::StateError(format!("Failed to unlock session file: {}", e)))?;

        Ok(Some(record))
    }

    /// Overwrite the saved session
    pub fn save(&self, record: &SessionRecord) -> Result<()> {
        // Truncate only once the lock is held
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.session_file)
            .map_err(|e| {
                EarnError::StateError(format!("Failed to open session file for writing: {}", e))
            })?;

        file.lock_exclusive().map_err(|e| {
            EarnError::StateError(format!("Failed to lock session file for writing: {}", e))
        })?;

        let written = file
            .set_len(0)
            .map_err(EarnError::from)
            .and_then(|_| serde_json::to_writer_pretty(&file, record).map_err(EarnError::from))
            .and_then(|_| file.sync_all().map_err(EarnError::from));

        file.unlock()
            .map_err(|e| EarnError::StateError(format!("Failed to unlock session file: {}", e)))?;

        written
    }

    /// Delete the saved session. Returns whether one existed.
    pub fn clear(&self) -> Result<bool> {
        if !self.session_file.exists() {
            return Ok(false);
        }

        fs::remove_file(&self.session_file)
            .map_err(|e| EarnError::StateError(format!("Failed to delete session file: {}", e)))?;
        Ok(true)
    }
}
