//! File-backed access to `jobs.json`.

use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

use crate::domain::job::BackupJob;
use crate::error::PanelError;
use crate::store::{read_optional, write_whole};

/// Handle on the job list file.
#[derive(Debug, Clone)]
pub struct JobStore {
    path: PathBuf,
}

impl JobStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the job list.
    ///
    /// A missing file is an empty list.  So is a file that does not parse as
    /// JSON at all; a warning is logged and the next save overwrites it.
    ///
    /// # Errors
    ///
    /// [`PanelError::Io`] for read failures other than "not found", and for a
    /// file that is valid JSON but not a list of job records.  Such a file is
    /// left alone rather than replaced by whatever the next edit would save.
    pub fn load(&self) -> Result<Vec<BackupJob>, PanelError> {
        let Some(text) = read_optional(&self.path)? else {
            return Ok(Vec::new());
        };
        let value: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "jobs file is not JSON; treating as empty");
                return Ok(Vec::new());
            }
        };
        serde_json::from_value(value).map_err(|e| {
            let reason = format!("not a list of backup jobs: {e}");
            PanelError::io(&self.path, io::Error::new(io::ErrorKind::InvalidData, reason))
        })
    }

    /// Writes the whole list as pretty-printed JSON (two-space indent).
    pub fn save(&self, jobs: &[BackupJob]) -> Result<(), PanelError> {
        let text = serde_json::to_string_pretty(jobs)
            .map_err(|e| PanelError::io(&self.path, io::Error::other(e)))?;
        write_whole(&self.path, &text)
    }

    /// Loads, applies `edit`, and saves only if `edit` returned `Ok`.
    pub fn modify<T>(
        &self,
        edit: impl FnOnce(&mut Vec<BackupJob>) -> Result<T, PanelError>,
    ) -> Result<T, PanelError> {
        let mut jobs = self.load()?;
        let out = edit(&mut jobs)?;
        self.save(&jobs)?;
        Ok(out)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
