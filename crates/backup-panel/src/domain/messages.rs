//! JSON shapes exchanged with the browser.
//!
//! Request bodies are lenient: a missing string field deserializes to `""`
//! and is rejected (or defaulted) by the use case, so the user gets the same
//! "X is required" message whether the key was absent or blank.
//!
//! # Remote fields
//!
//! Remote create and update bodies carry rclone fields in two places:
//!
//! ```json
//! { "name": "work", "provider": "s3",
//!   "parameters": { "provider": "AWS", "region": "eu-west-1" } }
//! ```
//!
//! Top-level keys other than `name` / `provider` / `parameters` are treated
//! as fields too (`{"name": "od", "provider": "onedrive", "token": {...}}`),
//! and `parameters` wins when both name the same key.  The nested form is
//! needed for S3, whose rclone `provider` field clashes with the panel's
//! provider tag.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use backup_core::config::remote::FieldSet;
use backup_core::DiskInfo;

/// Lines returned by a one-shot log view when `?lines=` is absent.
pub const DEFAULT_TAIL_LINES: usize = 200;

// ── Requests ──────────────────────────────────────────────────────────────────

/// `POST /api/remotes`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateRemoteRequest {
    #[serde(default)]
    pub name: String,
    /// Provider tag (`onedrive`, `gdrive`, `dropbox`, `s3`, `sftp`, `webdav`).
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CreateRemoteRequest {
    pub fn field_set(&self) -> FieldSet {
        merge_fields(&self.extra, &self.parameters, &[])
    }
}

/// `PUT /api/remotes/{name}`.  An empty value removes the key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRemoteRequest {
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UpdateRemoteRequest {
    pub fn field_set(&self) -> FieldSet {
        merge_fields(&self.extra, &self.parameters, &["name"])
    }
}

/// `POST /api/rclone-config`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadConfigRequest {
    #[serde(default)]
    pub content: String,
}

/// `POST /api/trigger`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TriggerRequest {
    #[serde(default)]
    pub name: String,
}

/// Query string of `GET /api/logs/{name}`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LogQuery {
    pub lines: Option<usize>,
}

impl LogQuery {
    pub fn lines(&self) -> usize {
        self.lines.unwrap_or(DEFAULT_TAIL_LINES)
    }
}

// ── Responses ─────────────────────────────────────────────────────────────────

/// One entry of `GET /api/remotes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSummary {
    pub name: String,
    /// rclone backend type; `"unknown"` when the daemon reports none and
    /// `"?"` when it could not be asked.
    #[serde(rename = "type")]
    pub kind: String,
}

/// `GET /api/status`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    /// Raw contents of each `status_*.json`.
    pub accounts: Vec<Value>,
    /// One entry per distinct job backup path.
    pub disks: Vec<DiskInfo>,
    pub timestamp: String,
}

/// `GET /api/logs/{name}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogContent {
    pub content: String,
    pub filename: String,
}

// ── Field conversion ──────────────────────────────────────────────────────────

/// Flattens JSON values into config-file strings.
///
/// Strings pass through, numbers and booleans are printed, `null` becomes
/// `""` and objects/arrays are re-encoded as compact JSON (the form rclone
/// stores OAuth tokens in).
fn merge_fields(
    extra: &Map<String, Value>,
    parameters: &Map<String, Value>,
    skip: &[&str],
) -> FieldSet {
    let mut out: FieldSet = Vec::new();
    let entries = extra
        .iter()
        .filter(|(key, _)| !skip.contains(&key.as_str()))
        .chain(parameters.iter());
    for (key, value) in entries {
        let value = field_value(value);
        match out.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => out.push((key.clone(), value)),
        }
    }
    out
}

fn field_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
