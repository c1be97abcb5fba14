//! Disk usage of a backup destination, as reported by `df -BG`.
//!
//! ```text
//! Filesystem     1G-blocks  Used Available Use% Mounted on
//! /dev/sda1           916G  389G      481G  45% /media/backup
//! ```
//!
//! The values are passed through as the strings `df` prints.  A column that is
//! missing, or a `df` run that failed, shows up as `"?"`.

use serde::{Deserialize, Serialize};

/// Placeholder for an unknown value.
pub const UNKNOWN: &str = "?";

/// Usage figures for one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskInfo {
    pub path: String,
    pub total: String,
    pub used: String,
    pub available: String,
    pub percent: String,
}

impl DiskInfo {
    /// A record with every figure unknown.
    pub fn unknown(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            total: UNKNOWN.to_string(),
            used: UNKNOWN.to_string(),
            available: UNKNOWN.to_string(),
            percent: UNKNOWN.to_string(),
        }
    }

    /// Parses the stdout of `df -BG <path>`.
    ///
    /// Only the second line is used; its whitespace-separated columns 1–4 are
    /// total, used, available and percent.  Output with fewer than two lines
    /// yields [`DiskInfo::unknown`].
    pub fn from_df_output(path: impl Into<String>, stdout: &str) -> Self {
        let mut info = Self::unknown(path);
        let Some(line) = stdout.trim().lines().nth(1) else {
            return info;
        };
        let columns: Vec<&str> = line.split_whitespace().collect();
        let column = |i: usize| columns.get(i).map_or(UNKNOWN, |c| *c).to_string();
        info.total = column(1);
        info.used = column(2);
        info.available = column(3);
        info.percent = column(4);
        info
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_typical_df_output() {
        // Arrange
        let out = "Filesystem     1G-blocks  Used Available Use% Mounted on\n\
                   /dev/sda1           916G  389G      481G  45% /media/backup\n";

        // Act
        let info = DiskInfo::from_df_output("/media/backup", out);

        // Assert
        assert_eq!(
            info,
            DiskInfo {
                path: "/media/backup".into(),
                total: "916G".into(),
                used: "389G".into(),
                available: "481G".into(),
                percent: "45%".into(),
            }
        );
    }

    #[test]
    fn test_header_only_output_is_unknown() {
        let info = DiskInfo::from_df_output("/x", "Filesystem 1G-blocks Used\n");
        assert_eq!(info, DiskInfo::unknown("/x"));
    }

    #[test]
    fn test_short_row_fills_missing_columns_with_placeholder() {
        let info = DiskInfo::from_df_output("/x", "header\n/dev/sdb 10G 2G\n");
        assert_eq!(info.total, "10G");
        assert_eq!(info.used, "2G");
        assert_eq!(info.available, UNKNOWN);
        assert_eq!(info.percent, UNKNOWN);
    }

    #[test]
    fn test_empty_output_is_unknown() {
        assert_eq!(DiskInfo::from_df_output("/x", ""), DiskInfo::unknown("/x"));
    }
}
