//! Infrastructure layer for backup-panel.
//!
//! Everything that touches the outside world besides the data files:
//!
//! - **`http_server`**   – router, shared state, listener and shutdown.
//! - **`handlers`**      – one axum handler per API route, plus the mapping
//!   from [`backup_core::PanelError`] to HTTP status codes.
//! - **`rc_client`**     – `reqwest` client for the rclone RC API.
//! - **`process`**       – `df`, `tail` and `rclone about` with timeouts.
//! - **`log_stream`**    – `tail -f` owned by a task, exposed as a stream.
//! - **`settings_file`** – the optional TOML settings file.

pub mod handlers;
pub mod http_server;
pub mod log_stream;
pub mod process;
pub mod rc_client;
pub mod settings_file;

pub use http_server::{router, run_server, AppState};
