//! Backup logs: listing, one-shot tail and name resolution for streaming.

use std::path::PathBuf;
use std::sync::Arc;

use backup_core::store::{LogCatalogue, LogFile};
use backup_core::{JobStore, PanelError};

use crate::application::ports::SystemTools;
use crate::domain::messages::LogContent;

pub struct LogsUseCase {
    jobs: JobStore,
    data_dir: PathBuf,
    tools: Arc<dyn SystemTools>,
}

impl LogsUseCase {
    pub fn new(jobs: JobStore, data_dir: impl Into<PathBuf>, tools: Arc<dyn SystemTools>) -> Self {
        Self {
            jobs,
            data_dir: data_dir.into(),
            tools,
        }
    }

    /// Log directories depend on the current job list, so the catalogue is
    /// rebuilt per call.
    fn catalogue(&self) -> Result<LogCatalogue, PanelError> {
        Ok(LogCatalogue::for_jobs(&self.data_dir, &self.jobs.load()?))
    }

    pub fn list(&self) -> Result<Vec<LogFile>, PanelError> {
        Ok(self.catalogue()?.list())
    }

    /// Path of the listed log called `name`.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, PanelError> {
        self.catalogue()?.resolve(name)
    }

    /// The last `lines` lines of the log called `name`.
    pub async fn content(&self, name: &str, lines: usize) -> Result<LogContent, PanelError> {
        let path = self.resolve(name)?;
        let content = self.tools.tail_lines(&path, lines).await?;
        Ok(LogContent {
            content,
            filename: name.to_string(),
        })
    }
}
