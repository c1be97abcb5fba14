//! Application layer for backup-panel.
//!
//! One use-case struct per area of the API.  Each holds the stores it reads
//! and the ports it calls, and turns a request into store edits, RC calls or
//! subprocess runs.  Handlers in `infrastructure::handlers` only extract the
//! request and serialize the result.
//!
//! # Ports
//!
//! The RC API and the local commands (`df`, `tail`, `rclone about`) sit
//! behind the traits in [`ports`], so every use case can be tested with
//! `mockall` doubles and a temporary directory.

pub mod jobs;
pub mod logs;
pub mod ports;
pub mod remotes;
pub mod status;

pub use jobs::JobsUseCase;
pub use logs::LogsUseCase;
pub use ports::{RemoteControl, SystemTools};
pub use remotes::RemotesUseCase;
pub use status::StatusUseCase;
