//! File-backed stores for the add-on's data directory.
//!
//! Each store is a small value holding a path.  It is cheap to clone and is
//! handed to every request handler; there is no global state.
//!
//! - **`config_store`** – `rclone.conf`: read, redacted view, point edits,
//!   bulk replacement with timestamped backup.
//! - **`job_store`**    – `jobs.json`: load, save, read-modify-write.
//! - **`logs`**         – discovery of `backup_*.log` files.
//! - **`status`**       – `status_*.json` files written by the backup script.
//! - **`trigger`**      – the `trigger_<job>` "run now" sentinel.
//!
//! # Concurrency
//!
//! Writes replace the whole file (write to a uniquely named temporary file in
//! the same directory, then rename), so a reader never sees a half-written
//! file and two simultaneous writers never clobber each other's data.  There is no locking between
//! requests: two concurrent read-modify-write cycles race and the later
//! rename wins, discarding the earlier change.  A file lock or a single
//! writer task would be needed to close that gap.

pub mod config_store;
pub mod job_store;
pub mod logs;
pub mod status;
pub mod trigger;

pub use config_store::ConfigStore;
pub use job_store::JobStore;
pub use logs::{LogCatalogue, LogFile};

use std::io::{ErrorKind, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::PanelError;

/// Reads `path` to a string; a missing file reads as `None`.
pub(crate) fn read_optional(path: &Path) -> Result<Option<String>, PanelError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(PanelError::io(path, e)),
    }
}

/// Replaces the contents of `path` with `content` in one step.
///
/// The data goes to a uniquely named temporary file in the same directory,
/// which is then renamed over `path`; concurrent writers never share a
/// temporary file.  The parent directory is created if needed.  An existing
/// file's permissions are carried over (rclone.conf is usually `0600`); a new
/// file is created readable by its owner only.
pub(crate) fn write_whole(path: &Path, content: &str) -> Result<(), PanelError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| PanelError::io(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| PanelError::io(dir, e))?;
    tmp.write_all(content.as_bytes())
        .map_err(|e| PanelError::io(tmp.path(), e))?;
    if let Ok(meta) = std::fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(|e| PanelError::io(tmp.path(), e))?;
    }
    tmp.persist(path).map_err(|e| PanelError::io(path, e.error))?;
    Ok(())
}
