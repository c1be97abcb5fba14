//! Per-account status files written by the backup script.
//!
//! Each `status_<account>.json` is passed through as-is.  The panel does not
//! interpret the contents.

use std::path::Path;

use serde_json::{json, Value};
use tracing::debug;

/// Reads every `status_*.json` in `dir`, sorted by file name.
///
/// A file that cannot be read or parsed becomes
/// `{"account": <name>, "status": "unknown", "message": "Status file unreadable"}`.
/// A missing directory yields an empty list.
pub fn read_account_statuses(dir: &Path) -> Vec<Value> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut paths: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("status_") && n.ends_with(".json"))
        })
        .collect();
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let parsed = std::fs::read_to_string(&path)
                .ok()
                .and_then(|text| serde_json::from_str::<Value>(&text).ok());
            parsed.unwrap_or_else(|| {
                debug!(path = %path.display(), "unreadable status file");
                let account = path
                    .file_stem()
                    .map(|s| s.to_string_lossy())
                    .map(|s| s.trim_start_matches("status_").to_string())
                    .unwrap_or_default();
                json!({
                    "account": account,
                    "status": "unknown",
                    "message": "Status file unreadable",
                })
            })
        })
        .collect()
}
