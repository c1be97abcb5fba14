//! The status page: per-account status files, disk usage per backup path.

use std::path::PathBuf;
use std::sync::Arc;

use futures_util::future::join_all;

use backup_core::domain::clock::local_iso_now;
use backup_core::store::status::read_account_statuses;
use backup_core::{JobStore, PanelError};

use crate::application::ports::SystemTools;
use crate::domain::messages::StatusReport;

pub struct StatusUseCase {
    jobs: JobStore,
    status_dir: PathBuf,
    tools: Arc<dyn SystemTools>,
}

impl StatusUseCase {
    pub fn new(jobs: JobStore, status_dir: impl Into<PathBuf>, tools: Arc<dyn SystemTools>) -> Self {
        Self {
            jobs,
            status_dir: status_dir.into(),
            tools,
        }
    }

    /// Builds the status report.  Disk usage is queried once per distinct
    /// backup path, in job order, all at the same time.
    pub async fn report(&self) -> Result<StatusReport, PanelError> {
        let jobs = self.jobs.load()?;

        let mut paths: Vec<&str> = Vec::new();
        for job in &jobs {
            let path = job.backup_path.as_str();
            if !path.is_empty() && !paths.contains(&path) {
                paths.push(path);
            }
        }
        let disks = join_all(paths.iter().map(|path| self.tools.disk_usage(path))).await;

        Ok(StatusReport {
            accounts: read_account_statuses(&self.status_dir),
            disks,
            timestamp: local_iso_now(),
        })
    }
}
