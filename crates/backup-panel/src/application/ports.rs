//! Outbound ports: the rclone daemon and the local command-line tools.

use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;

use backup_core::{DiskInfo, PanelError};

/// The rclone remote-control API.
///
/// The production implementation POSTs JSON over HTTP; tests use the
/// generated `MockRemoteControl`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteControl: Send + Sync {
    /// Calls `endpoint` (e.g. `config/listremotes`) with `params` as the JSON
    /// body and returns the decoded JSON reply.
    ///
    /// # Errors
    ///
    /// [`PanelError::Upstream`] for a non-2xx reply, a transport failure or a
    /// timeout.
    async fn call(&self, endpoint: &str, params: Value) -> Result<Value, PanelError>;
}

/// Local commands run on behalf of a request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SystemTools: Send + Sync {
    /// Disk usage of `path`.  Never fails: unknown figures are `"?"`.
    async fn disk_usage(&self, path: &str) -> DiskInfo;

    /// The last `lines` lines of the file at `path`.
    async fn tail_lines(&self, path: &Path, lines: usize) -> Result<String, PanelError>;

    /// `rclone about <remote>: --json`, decoded.
    async fn remote_about(&self, remote: &str) -> Result<Value, PanelError>;
}
