//! Error taxonomy shared by every panel operation.
//!
//! Each request fails on its own: none of these errors stops the server.  The
//! HTTP layer turns a [`PanelError`] into a status code plus a JSON body
//! carrying the `Display` text, so the messages here are written for the
//! person looking at the browser.
//!
//! Parsing the rclone config text never produces an error.  Malformed lines
//! are skipped instead (see [`crate::config::document`]).

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors returned by stores, validators and external calls.
#[derive(Debug, Error)]
pub enum PanelError {
    /// A referenced section, job or log file does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A create request named something that already exists.
    #[error("{0}")]
    Conflict(String),

    /// The request itself is unusable: a missing required field, a name with
    /// disallowed characters, a malformed token payload, and so on.
    #[error("{0}")]
    InvalidInput(String),

    /// The rclone RC API or a command-line tool failed or timed out.
    #[error("{message}")]
    Upstream {
        message: String,
        /// `true` when the failure was a timeout rather than an error reply.
        timed_out: bool,
    },

    /// A file system read or write failed.
    #[error("I/O error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PanelError {
    /// Wraps an I/O error together with the path that caused it.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// An upstream failure that produced a reply (or a spawn error).
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
            timed_out: false,
        }
    }

    /// An upstream call that did not answer in time.
    pub fn upstream_timeout(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
            timed_out: true,
        }
    }

    /// Short machine-readable kind, used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::InvalidInput(_) => "invalid_input",
            Self::Upstream { .. } => "upstream",
            Self::Io { .. } => "io",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
