//! Optional TOML settings file.
//!
//! Every key is optional; a key that is present overrides the built-in
//! default, and a command-line flag or `ADDON_*` variable overrides the file.
//!
//! ```toml
//! bind = "127.0.0.1"
//! port = 8099
//! data_dir = "/data"
//! rc_url = "http://127.0.0.1:5572"
//!
//! [timeouts]
//! rc_secs = 30
//! remote_test_secs = 30
//! command_secs = 5
//! ```

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::config::PanelConfig;

/// Error type for reading the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error reading settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Contents of the settings file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PanelSettings {
    pub bind: Option<IpAddr>,
    pub port: Option<u16>,
    pub data_dir: Option<PathBuf>,
    pub status_dir: Option<PathBuf>,
    pub rclone_conf: Option<PathBuf>,
    pub jobs_file: Option<PathBuf>,
    pub rc_url: Option<String>,
    pub rclone_bin: Option<PathBuf>,
    pub tail_bin: Option<PathBuf>,
    pub df_bin: Option<PathBuf>,
    #[serde(default)]
    pub timeouts: TimeoutSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeoutSettings {
    pub rc_secs: Option<u64>,
    pub remote_test_secs: Option<u64>,
    pub command_secs: Option<u64>,
}

impl PanelSettings {
    /// Overwrites the fields of `config` that this file sets.
    pub fn apply_to(self, config: &mut PanelConfig) {
        if let Some(ip) = self.bind {
            config.bind_addr.set_ip(ip);
        }
        if let Some(port) = self.port {
            config.bind_addr.set_port(port);
        }
        set(&mut config.data_dir, self.data_dir);
        set(&mut config.status_dir, self.status_dir);
        set(&mut config.rclone_conf, self.rclone_conf);
        set(&mut config.jobs_file, self.jobs_file);
        set(&mut config.rc_url, self.rc_url);
        set(&mut config.rclone_bin, self.rclone_bin);
        set(&mut config.tail_bin, self.tail_bin);
        set(&mut config.df_bin, self.df_bin);
        set(&mut config.rc_timeout, self.timeouts.rc_secs.map(Duration::from_secs));
        set(
            &mut config.remote_test_timeout,
            self.timeouts.remote_test_secs.map(Duration::from_secs),
        );
        set(
            &mut config.command_timeout,
            self.timeouts.command_secs.map(Duration::from_secs),
        );
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Parses settings from TOML text.
pub fn parse_settings(text: &str) -> Result<PanelSettings, SettingsError> {
    Ok(toml::from_str(text)?)
}

/// Reads and parses the settings file at `path`.
///
/// # Errors
///
/// [`SettingsError::Io`] if the file cannot be read (including when it does
/// not exist: a path given explicitly must exist), [`SettingsError::Parse`]
/// for malformed TOML or unknown keys.
pub fn load_settings(path: &Path) -> Result<PanelSettings, SettingsError> {
    let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_settings(&text)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
