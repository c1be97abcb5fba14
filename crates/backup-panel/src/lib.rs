//! backup-panel library crate.
//!
//! The HTTP control panel of the Cloud-to-Disk Backup add-on.  It lets a
//! user manage rclone remotes and backup jobs from a browser, watch backup
//! logs live and start a backup on demand.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Browser (JSON over HTTP, SSE for live logs)
//!         ↕
//! [backup-panel]
//!   ├── domain/            PanelConfig, request/response shapes
//!   ├── application/       Use cases: remotes, jobs, status, logs
//!   │     └── ports        RemoteControl, SystemTools traits
//!   └── infrastructure/
//!         ├── http_server  axum router, shared state, shutdown
//!         ├── handlers     one handler per route, error → status code
//!         ├── rc_client    rclone RC API over reqwest
//!         ├── process      df / tail / rclone about with timeouts
//!         └── log_stream   tail -f owned by a task
//!         ↕
//! [backup-core]  rclone.conf document, job model, data-dir stores
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain`, `backup-core` and the port traits;
//!   it never names `axum`, `reqwest` or `tokio::process`.
//! - `infrastructure` implements the ports and owns everything network- or
//!   process-shaped.
//!
//! # For beginners: why ports?
//!
//! The RC daemon and the `df` / `tail` / `rclone` binaries are not there
//! when unit tests run.  Putting them behind traits lets each use case be
//! tested against a `mockall` double and a temporary directory, while the
//! real implementations are exercised separately against a fake RC server
//! and small shell scripts.

/// Domain layer: configuration and JSON message types (no I/O).
pub mod domain;

/// Application layer: one use case per API area.
pub mod application;

/// Infrastructure layer: HTTP server, RC client, subprocesses.
pub mod infrastructure;
