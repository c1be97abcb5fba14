//! Panel configuration.
//!
//! [`PanelConfig`] holds every runtime setting.  `main.rs` fills it from, in
//! increasing priority: the defaults below, an optional TOML settings file,
//! and command-line flags / `ADDON_*` environment variables.
//!
//! Keeping it a plain struct (no globals, no env lookups here) lets tests
//! build a panel pointed at a temporary directory.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Port the add-on's ingress proxy forwards to.
pub const DEFAULT_PORT: u16 = 8099;

/// All runtime configuration for the panel.
///
/// # Example
///
/// ```rust
/// use backup_panel::domain::PanelConfig;
///
/// let cfg = PanelConfig::default();
/// assert_eq!(cfg.bind_addr.port(), 8099);
/// assert_eq!(cfg.jobs_file.to_str(), Some("/data/jobs.json"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PanelConfig {
    /// Address the HTTP server listens on.
    pub bind_addr: SocketAddr,
    /// Add-on data directory.  Holds `logs/` and the trigger files.
    pub data_dir: PathBuf,
    /// Directory of `status_*.json` files written by the backup script.
    pub status_dir: PathBuf,
    /// The rclone config file the panel edits.
    pub rclone_conf: PathBuf,
    /// The JSON job list.
    pub jobs_file: PathBuf,
    /// Base URL of the rclone daemon's remote-control API.
    pub rc_url: String,
    /// `rclone` executable used for connection tests.
    pub rclone_bin: PathBuf,
    /// `tail` executable used for log content and streaming.
    pub tail_bin: PathBuf,
    /// `df` executable used for disk usage.
    pub df_bin: PathBuf,
    /// Timeout for each RC API call.
    pub rc_timeout: Duration,
    /// Timeout for `rclone about`.
    pub remote_test_timeout: Duration,
    /// Timeout for `df` and one-shot `tail`.
    pub command_timeout: Duration,
}

impl Default for PanelConfig {
    /// | Field                 | Default                  |
    /// |-----------------------|--------------------------|
    /// | bind_addr             | `0.0.0.0:8099`           |
    /// | data_dir              | `/data`                  |
    /// | status_dir            | `/data/status`           |
    /// | rclone_conf           | `/data/rclone.conf`      |
    /// | jobs_file             | `/data/jobs.json`        |
    /// | rc_url                | `http://127.0.0.1:5572`  |
    /// | rclone / tail / df    | looked up on `PATH`      |
    /// | rc_timeout            | 30 s                     |
    /// | remote_test_timeout   | 30 s                     |
    /// | command_timeout       | 5 s                      |
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            data_dir: PathBuf::from("/data"),
            status_dir: PathBuf::from("/data/status"),
            rclone_conf: PathBuf::from("/data/rclone.conf"),
            jobs_file: PathBuf::from("/data/jobs.json"),
            rc_url: "http://127.0.0.1:5572".to_string(),
            rclone_bin: PathBuf::from("rclone"),
            tail_bin: PathBuf::from("tail"),
            df_bin: PathBuf::from("df"),
            rc_timeout: Duration::from_secs(30),
            remote_test_timeout: Duration::from_secs(30),
            command_timeout: Duration::from_secs(5),
        }
    }
}

impl PanelConfig {
    /// A config with every data path under `dir`.  Used by tests.
    pub fn rooted_at(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            status_dir: dir.join("status"),
            rclone_conf: dir.join("rclone.conf"),
            jobs_file: dir.join("jobs.json"),
            data_dir: dir,
            ..Self::default()
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
