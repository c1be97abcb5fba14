//! Local-time timestamp formatting.
//!
//! The backup scripts and the browser UI both read timestamps written by the
//! panel, and both expect local time without a UTC offset
//! (`2026-10-19T14:03:07.123456`).

use std::time::SystemTime;

use chrono::{DateTime, Local};

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
const BACKUP_SUFFIX_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Current local time as an ISO-8601 string without offset.
pub fn local_iso_now() -> String {
    Local::now().naive_local().format(ISO_FORMAT).to_string()
}

/// `time` converted to local time, formatted like [`local_iso_now`].
pub fn local_iso(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .naive_local()
        .format(ISO_FORMAT)
        .to_string()
}

/// `YYYYMMDD_HHMMSS` suffix for config backup files.
pub fn backup_suffix_now() -> String {
    Local::now().format(BACKUP_SUFFIX_FORMAT).to_string()
}
