//! Backup jobs: CRUD on `jobs.json` and the "run now" trigger.

use std::path::PathBuf;

use tracing::info;

use backup_core::domain::job::{create_job_now, delete_job, update_job};
use backup_core::store::trigger::write_trigger;
use backup_core::{BackupJob, JobPatch, JobStore, NewJob, PanelError};

pub struct JobsUseCase {
    store: JobStore,
    data_dir: PathBuf,
}

impl JobsUseCase {
    pub fn new(store: JobStore, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            data_dir: data_dir.into(),
        }
    }

    pub fn list(&self) -> Result<Vec<BackupJob>, PanelError> {
        self.store.load()
    }

    pub fn create(&self, request: NewJob) -> Result<BackupJob, PanelError> {
        let job = self.store.modify(|jobs| create_job_now(jobs, request))?;
        info!(id = %job.id, name = %job.name, remote = %job.remote_name, "job created");
        Ok(job)
    }

    pub fn update(&self, id: &str, patch: JobPatch) -> Result<BackupJob, PanelError> {
        let job = self.store.modify(|jobs| update_job(jobs, id, patch))?;
        info!(id, name = %job.name, "job updated");
        Ok(job)
    }

    pub fn delete(&self, id: &str) -> Result<(), PanelError> {
        let job = self.store.modify(|jobs| delete_job(jobs, id))?;
        info!(id, name = %job.name, "job deleted");
        Ok(())
    }

    /// Asks the backup loop to run the named job now.
    ///
    /// # Errors
    ///
    /// [`PanelError::InvalidInput`] for a blank name, [`PanelError::NotFound`]
    /// for an unknown job.
    pub fn trigger(&self, name: &str) -> Result<String, PanelError> {
        let jobs = self.store.load()?;
        write_trigger(&self.data_dir, &jobs, name)?;
        Ok(format!("Backup triggered for \"{}\"", name.trim()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
