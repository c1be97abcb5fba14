//! Domain layer for backup-panel.
//!
//! Plain data with no I/O: the runtime settings and the JSON shapes the
//! browser sends and receives.  The rclone config document and the job model
//! live in `backup-core`; this layer only adds what is specific to the HTTP
//! panel.
//!
//! # What does NOT belong here?
//!
//! - `tokio`, `axum` or `reqwest` types
//! - File reads, subprocesses or environment variable lookups

pub mod config;
pub mod messages;

pub use config::PanelConfig;
pub use messages::{
    CreateRemoteRequest, LogContent, LogQuery, RemoteSummary, StatusReport, TriggerRequest,
    UpdateRemoteRequest, UploadConfigRequest,
};
