//! # backup-core
//!
//! Shared library for the Cloud-to-Disk Backup control panel.  It holds the
//! rclone configuration document, the backup-job model, and the file-backed
//! stores that read and rewrite the add-on's data directory.
//!
//! This crate has no network code and no async runtime.  Everything it does
//! is plain text processing and synchronous file I/O, so the HTTP layer in
//! `backup-panel` can call it directly from a request handler.
//!
//! # Architecture overview (for beginners)
//!
//! The add-on copies cloud storage to a local disk by running `rclone`.  The
//! panel is how a user configures it.  Three kinds of state live on disk:
//!
//! - **`rclone.conf`** – an INI-like file with one `[section]` per cloud
//!   "remote".  rclone itself reads this file, so the panel must write it
//!   back in exactly the shape rclone expects.  See [`config`].
//!
//! - **`jobs.json`** – a JSON array of backup jobs, each pairing a remote with
//!   a local destination path.  See [`domain::job`].
//!
//! - **status, log and trigger files** – written by the backup scripts (or,
//!   for triggers, by the panel for the scripts).  See [`store`].
//!
//! Every request builds its view of these files fresh, mutates it in memory
//! and rewrites the whole file.  There is no cache and no lock.

pub mod config;
pub mod domain;
pub mod error;
pub mod store;

// Re-export the most-used types at the crate root so callers can write
// `backup_core::ConfigDocument` instead of the full module path.
pub use config::document::{ConfigDocument, Section};
pub use config::provider::Provider;
pub use config::redact::{redact_section, redact_text, REDACTED};
pub use domain::disk::DiskInfo;
pub use domain::job::{BackupJob, JobPatch, NewJob};
pub use error::PanelError;
pub use store::{ConfigStore, JobStore};
