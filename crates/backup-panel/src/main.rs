//! Cloud-to-Disk Backup control panel: entry point.
//!
//! Serves the JSON API the add-on's web page uses to manage rclone remotes
//! and backup jobs, show disk and account status, and follow backup logs.
//!
//! # Usage
//!
//! ```text
//! backup-panel [OPTIONS]
//!
//! Options:
//!   --port        <PORT>  HTTP port                     [default: 8099]
//!   --bind        <IP>    HTTP bind address             [default: 0.0.0.0]
//!   --data-dir    <DIR>   add-on data directory         [default: /data]
//!   --status-dir  <DIR>   status_*.json directory       [default: /data/status]
//!   --rclone-conf <FILE>  rclone config file            [default: /data/rclone.conf]
//!   --jobs-file   <FILE>  job list                      [default: /data/jobs.json]
//!   --rc-url      <URL>   rclone RC API base URL        [default: http://127.0.0.1:5572]
//!   --rclone-bin  <FILE>  rclone executable             [default: rclone]
//!   --settings    <FILE>  optional TOML settings file
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable               | Flag            |
//! |------------------------|-----------------|
//! | `ADDON_WEB_PORT`       | `--port`        |
//! | `ADDON_WEB_BIND`       | `--bind`        |
//! | `ADDON_DATA_DIR`       | `--data-dir`    |
//! | `ADDON_STATUS_DIR`     | `--status-dir`  |
//! | `ADDON_RCLONE_CONF`    | `--rclone-conf` |
//! | `ADDON_JOBS_FILE`      | `--jobs-file`   |
//! | `ADDON_RCLONE_RC_URL`  | `--rc-url`      |
//! | `ADDON_RCLONE_BIN`     | `--rclone-bin`  |
//! | `ADDON_PANEL_SETTINGS` | `--settings`    |
//!
//! A flag or variable beats the settings file, which beats the built-in
//! defaults listed in [`PanelConfig`].

use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use backup_panel::domain::PanelConfig;
use backup_panel::infrastructure::run_server;
use backup_panel::infrastructure::settings_file::load_settings;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Cloud-to-Disk Backup control panel.
///
/// Every option is optional so that an unset flag can fall through to the
/// settings file and then to the defaults.
#[derive(Debug, Parser)]
#[command(
    name = "backup-panel",
    about = "HTTP control panel for the Cloud-to-Disk Backup add-on",
    version
)]
struct Cli {
    /// TCP port for the HTTP server.
    #[arg(long, env = "ADDON_WEB_PORT")]
    port: Option<u16>,

    /// IP address to bind the HTTP server to.
    #[arg(long, env = "ADDON_WEB_BIND")]
    bind: Option<String>,

    /// Add-on data directory (logs and trigger files live here).
    #[arg(long, env = "ADDON_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Directory of `status_*.json` files written by the backup script.
    #[arg(long, env = "ADDON_STATUS_DIR")]
    status_dir: Option<PathBuf>,

    /// rclone config file the panel edits.
    #[arg(long, env = "ADDON_RCLONE_CONF")]
    rclone_conf: Option<PathBuf>,

    /// JSON file holding the backup job list.
    #[arg(long, env = "ADDON_JOBS_FILE")]
    jobs_file: Option<PathBuf>,

    /// Base URL of the rclone remote-control API.
    #[arg(long, env = "ADDON_RCLONE_RC_URL")]
    rc_url: Option<String>,

    /// rclone executable used for connection tests.
    #[arg(long, env = "ADDON_RCLONE_BIN")]
    rclone_bin: Option<PathBuf>,

    /// Optional TOML settings file.
    #[arg(long, env = "ADDON_PANEL_SETTINGS")]
    settings: Option<PathBuf>,
}

impl Cli {
    /// Builds the [`PanelConfig`]: defaults, then the settings file, then
    /// whatever was given on the command line or in the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file cannot be read or parsed, or if
    /// `--bind` is not a valid IP address.
    fn into_panel_config(self) -> anyhow::Result<PanelConfig> {
        let mut config = PanelConfig::default();

        if let Some(path) = &self.settings {
            load_settings(path)
                .with_context(|| format!("failed to load settings from {}", path.display()))?
                .apply_to(&mut config);
        }

        if let Some(bind) = &self.bind {
            let ip: IpAddr = bind
                .parse()
                .with_context(|| format!("invalid bind address: '{bind}'"))?;
            config.bind_addr.set_ip(ip);
        }
        if let Some(port) = self.port {
            config.bind_addr.set_port(port);
        }
        override_with(&mut config.data_dir, self.data_dir);
        override_with(&mut config.status_dir, self.status_dir);
        override_with(&mut config.rclone_conf, self.rclone_conf);
        override_with(&mut config.jobs_file, self.jobs_file);
        override_with(&mut config.rc_url, self.rc_url);
        override_with(&mut config.rclone_bin, self.rclone_bin);

        Ok(config)
    }
}

fn override_with<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// 1. Logging is initialised from `RUST_LOG` (default `info`).
/// 2. CLI arguments, environment and settings file become a [`PanelConfig`].
/// 3. The server runs until Ctrl+C, then closes open log streams and waits
///    for in-flight requests to finish.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_panel_config()?;

    info!(
        "Cloud-to-Disk Backup panel starting: http={}, data={}",
        config.bind_addr,
        config.data_dir.display()
    );

    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("received Ctrl+C, initiating graceful shutdown"),
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
                // Without a signal handler, run until killed.
                std::future::pending::<()>().await;
            }
        }
    };

    run_server(config, shutdown).await?;

    info!("Cloud-to-Disk Backup panel stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
