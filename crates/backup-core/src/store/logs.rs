//! Discovery of backup run logs.
//!
//! The backup script writes `backup_<timestamp>.log` files into
//! `<data_dir>/logs` and into `<backup_path>/logs` of each job.  The panel
//! lists the newest of them and lets the user open one by file name.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Serialize;

use crate::domain::clock::local_iso;
use crate::domain::job::BackupJob;
use crate::error::PanelError;

/// At most this many files are listed.
pub const MAX_LOG_FILES: usize = 30;

const PREFIX: &str = "backup_";
const SUFFIX: &str = ".log";

/// One listed log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogFile {
    /// Base name, e.g. `backup_20240101_020000.log`.
    pub name: String,
    pub path: String,
    /// Size in bytes.
    pub size: u64,
    /// Local-time ISO-8601 modification time.
    pub modified: String,
    #[serde(skip)]
    modified_at: SystemTime,
}

/// The set of directories searched for logs.
#[derive(Debug, Clone)]
pub struct LogCatalogue {
    dirs: Vec<PathBuf>,
}

impl LogCatalogue {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// `<data_dir>/logs` followed by `<backup_path>/logs` for each job.
    ///
    /// Jobs whose `backup_path` is empty or relative contribute nothing; a
    /// relative path would resolve against the panel's working directory.
    pub fn for_jobs(data_dir: &Path, jobs: &[BackupJob]) -> Self {
        let mut dirs = vec![data_dir.join("logs")];
        for job in jobs {
            let backup_path = Path::new(job.backup_path.trim());
            if !backup_path.is_absolute() {
                continue;
            }
            let dir = backup_path.join("logs");
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        Self { dirs }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// The newest [`MAX_LOG_FILES`] logs, newest first.
    ///
    /// Directories that are missing or unreadable are skipped.  When two
    /// directories hold a file with the same base name, the one found first
    /// wins.
    pub fn list(&self) -> Vec<LogFile> {
        let mut seen = HashSet::new();
        let mut files = Vec::new();

        for dir in &self.dirs {
            let Ok(entries) = std::fs::read_dir(dir) else {
                continue;
            };
            let mut entries: Vec<_> = entries.filter_map(Result::ok).collect();
            entries.sort_by_key(|e| e.file_name());

            for entry in entries {
                let name = entry.file_name().to_string_lossy().into_owned();
                if !is_backup_log(&name) || seen.contains(&name) {
                    continue;
                }
                let Ok(meta) = entry.metadata() else { continue };
                if !meta.is_file() {
                    continue;
                }
                let modified_at = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                seen.insert(name.clone());
                files.push(LogFile {
                    name,
                    path: entry.path().display().to_string(),
                    size: meta.len(),
                    modified: local_iso(modified_at),
                    modified_at,
                });
            }
        }

        files.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
        files.truncate(MAX_LOG_FILES);
        files
    }

    /// Finds a listed log by name.
    ///
    /// Any directory part in `filename` is discarded, so only base names of
    /// files from [`LogCatalogue::list`] can ever resolve.
    ///
    /// # Errors
    ///
    /// [`PanelError::NotFound`] if no listed log has that name.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf, PanelError> {
        let not_found = || PanelError::NotFound("Log not found".to_string());
        let base = Path::new(filename)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(not_found)?;
        self.list()
            .into_iter()
            .find(|f| f.name == base)
            .map(|f| PathBuf::from(f.path))
            .ok_or_else(not_found)
    }
}

fn is_backup_log(name: &str) -> bool {
    name.len() >= PREFIX.len() + SUFFIX.len() && name.starts_with(PREFIX) && name.ends_with(SUFFIX)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
