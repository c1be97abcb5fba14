//! The rclone configuration document.
//!
//! rclone keeps its remotes in an INI-like file:
//!
//! ```text
//! [section-name]
//! key = value
//! key2 = value2
//!
//! [section-name-2]
//! key = value
//! ```
//!
//! - **`document`** – lenient parser and exact serializer for that file.
//! - **`redact`**   – display-only masking of secret values.
//! - **`provider`** – per-provider field templates used when creating a remote.
//! - **`remote`**   – create / update / delete of a single section.

pub mod document;
pub mod provider;
pub mod redact;
pub mod remote;
