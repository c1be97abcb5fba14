//! Display-only masking of secrets in the rclone config.
//!
//! The panel shows the config file in the browser.  OAuth tokens, client
//! secrets and passwords must never make that trip, so their values are
//! replaced with [`REDACTED`] first.
//!
//! Redaction is for display only.  A write-back always starts from a fresh,
//! unredacted read of the file (see [`crate::store::ConfigStore::modify`]);
//! writing a redacted document would destroy the live credentials.

use crate::config::document::Section;

/// Marker that replaces every secret value.
pub const REDACTED: &str = "[REDACTED]";

/// Keys whose values are secrets.
pub const SECRET_KEYS: &[&str] = &[
    "token",
    "client_secret",
    "secret_access_key",
    "pass",
    "password",
    "app_key",
    "app_secret",
];

/// Returns `true` if the value stored under `key` must not be displayed.
///
/// Matching ignores ASCII case and surrounding whitespace.
pub fn is_secret_key(key: &str) -> bool {
    let key = key.trim();
    SECRET_KEYS.iter().any(|s| s.eq_ignore_ascii_case(key))
}

/// Redacts raw config text line by line.
///
/// A `key = value` line with a secret key keeps everything up to and
/// including the `=` and the whitespace after it; the rest of the line becomes
/// [`REDACTED`].  Every other line, including its line ending, is returned
/// unchanged.
///
/// # Example
///
/// ```rust
/// use backup_core::redact_text;
///
/// let shown = redact_text("[r]\ntype = drive\ntoken = {\"a\":1}\n");
/// assert_eq!(shown, "[r]\ntype = drive\ntoken = [REDACTED]\n");
/// ```
pub fn redact_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        let (body, ending) = split_line_ending(line);
        match body.split_once('=') {
            Some((key, value)) if is_secret_key(key) => {
                let spacing = value.len() - value.trim_start().len();
                out.push_str(key);
                out.push('=');
                out.push_str(&value[..spacing]);
                out.push_str(REDACTED);
            }
            _ => out.push_str(body),
        }
        out.push_str(ending);
    }
    out
}

/// Returns a copy of `section` with every secret value replaced.
///
/// Non-secret entries and the key order are unchanged.
pub fn redact_section(section: &Section) -> Section {
    let mut shown = Section::new(section.name());
    for (key, value) in section.iter() {
        if is_secret_key(key) {
            shown.set(key, REDACTED);
        } else {
            shown.set(key, value);
        }
    }
    shown
}

/// Splits a line produced by `split_inclusive('\n')` into body and ending.
fn split_line_ending(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
