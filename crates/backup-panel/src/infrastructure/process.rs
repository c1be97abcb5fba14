//! Local commands: `df`, `tail` and `rclone about`.
//!
//! Every command runs with a hard timeout.  The child is spawned with
//! `kill_on_drop`, so when the timeout fires and the future is dropped, the
//! process is killed instead of left running.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;
use tracing::debug;

use backup_core::{DiskInfo, PanelError};

use crate::application::ports::SystemTools;
use crate::domain::config::PanelConfig;

/// Message used when `rclone about` does not answer in time.
pub const REMOTE_TIMEOUT_MESSAGE: &str = "Connection timeout";

/// [`SystemTools`] backed by real executables.
#[derive(Debug, Clone)]
pub struct LocalTools {
    df_bin: PathBuf,
    tail_bin: PathBuf,
    rclone_bin: PathBuf,
    rclone_conf: PathBuf,
    command_timeout: Duration,
    remote_test_timeout: Duration,
}

impl LocalTools {
    pub fn from_config(config: &PanelConfig) -> Self {
        Self {
            df_bin: config.df_bin.clone(),
            tail_bin: config.tail_bin.clone(),
            rclone_bin: config.rclone_bin.clone(),
            rclone_conf: config.rclone_conf.clone(),
            command_timeout: config.command_timeout,
            remote_test_timeout: config.remote_test_timeout,
        }
    }
}

/// Outcome of [`run`] other than a finished process.
#[derive(Debug)]
pub enum RunError {
    /// The executable could not be started.
    Spawn(std::io::Error),
    /// The process was still running when the limit elapsed; it was killed.
    TimedOut,
}

/// Runs `program` with `args`, capturing stdout and stderr.
pub async fn run<I, S>(program: &Path, args: I, limit: Duration) -> Result<Output, RunError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    match tokio::time::timeout(limit, command.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(RunError::Spawn(e)),
        Err(_) => Err(RunError::TimedOut),
    }
}

#[async_trait]
impl SystemTools for LocalTools {
    async fn disk_usage(&self, path: &str) -> DiskInfo {
        match run(&self.df_bin, ["-BG", path], self.command_timeout).await {
            Ok(output) if output.status.success() => {
                DiskInfo::from_df_output(path, &String::from_utf8_lossy(&output.stdout))
            }
            Ok(output) => {
                debug!(path, status = %output.status, "df failed");
                DiskInfo::unknown(path)
            }
            Err(e) => {
                debug!(path, error = ?e, "df did not run");
                DiskInfo::unknown(path)
            }
        }
    }

    async fn tail_lines(&self, path: &Path, lines: usize) -> Result<String, PanelError> {
        let count = format!("-n{lines}");
        let args = [OsStr::new(&count), path.as_os_str()];
        match run(&self.tail_bin, args, self.command_timeout).await {
            Ok(output) => Ok(String::from_utf8_lossy(&output.stdout).into_owned()),
            Err(RunError::Spawn(e)) => Err(PanelError::io(&self.tail_bin, e)),
            Err(RunError::TimedOut) => Err(PanelError::upstream_timeout(format!(
                "tail of {} timed out",
                path.display()
            ))),
        }
    }

    async fn remote_about(&self, remote: &str) -> Result<Value, PanelError> {
        let target = format!("{remote}:");
        let args = [
            OsStr::new("about"),
            OsStr::new(&target),
            OsStr::new("--config"),
            self.rclone_conf.as_os_str(),
            OsStr::new("--json"),
        ];
        let output = match run(&self.rclone_bin, args, self.remote_test_timeout).await {
            Ok(output) => output,
            Err(RunError::Spawn(e)) => return Err(PanelError::io(&self.rclone_bin, e)),
            Err(RunError::TimedOut) => {
                return Err(PanelError::upstream_timeout(REMOTE_TIMEOUT_MESSAGE))
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(PanelError::upstream(stderr));
        }
        serde_json::from_slice(&output.stdout)
            .map_err(|e| PanelError::upstream(format!("unexpected output from rclone about: {e}")))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
