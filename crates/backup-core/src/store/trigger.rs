//! "Run now" sentinel files.
//!
//! The panel asks the backup loop to run a job immediately by creating
//! `<data_dir>/trigger_<job name>`.  The loop polls for these files, runs the
//! job and deletes the file.  The file holds the local time of the request.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::clock::local_iso_now;
use crate::domain::job::{find_by_name, BackupJob};
use crate::domain::name::validate_name;
use crate::error::PanelError;

/// Path of the trigger file for `job_name`.
pub fn trigger_path(data_dir: &Path, job_name: &str) -> PathBuf {
    data_dir.join(format!("trigger_{job_name}"))
}

/// Writes the trigger file for the job named `job_name` (trimmed).
///
/// # Errors
///
/// - [`PanelError::InvalidInput`] for an empty name, or one that is not safe
///   as a file name.
/// - [`PanelError::NotFound`] if no job has that name.
/// - [`PanelError::Io`] if the file cannot be written.
pub fn write_trigger(
    data_dir: &Path,
    jobs: &[BackupJob],
    job_name: &str,
) -> Result<PathBuf, PanelError> {
    let job_name = job_name.trim();
    if job_name.is_empty() {
        return Err(PanelError::InvalidInput("Job name required".to_string()));
    }
    if find_by_name(jobs, job_name).is_none() {
        return Err(PanelError::NotFound(format!("Job \"{job_name}\" not found")));
    }
    validate_name("Job", job_name)?;

    std::fs::create_dir_all(data_dir).map_err(|e| PanelError::io(data_dir, e))?;
    let path = trigger_path(data_dir, job_name);
    std::fs::write(&path, local_iso_now()).map_err(|e| PanelError::io(&path, e))?;
    info!(job = job_name, path = %path.display(), "backup triggered");
    Ok(path)
}
