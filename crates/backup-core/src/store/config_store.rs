//! File-backed access to `rclone.conf`.
//!
//! Every call reads the file fresh.  Point edits go through
//! [`ConfigStore::modify`], which parses the current (unredacted) file, runs
//! the edit and rewrites the file only if the edit succeeded.  A bulk upload
//! goes through [`ConfigStore::replace`], which keeps a timestamped copy of
//! the old file first.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::document::ConfigDocument;
use crate::config::redact::redact_text;
use crate::domain::clock::backup_suffix_now;
use crate::error::PanelError;
use crate::store::{read_optional, write_whole};

/// Handle on the rclone config file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file contents; a missing file reads as `""`.
    ///
    /// # Errors
    ///
    /// [`PanelError::Io`] for read failures other than "not found".
    pub fn read_raw(&self) -> Result<String, PanelError> {
        Ok(read_optional(&self.path)?.unwrap_or_default())
    }

    /// Parses the current file.  A missing file is an empty document.
    ///
    /// # Errors
    ///
    /// [`PanelError::Io`] for read failures other than "not found".
    pub fn load(&self) -> Result<ConfigDocument, PanelError> {
        Ok(ConfigDocument::parse(&self.read_raw()?))
    }

    /// File contents with secret values masked, for display.
    pub fn redacted_text(&self) -> Result<String, PanelError> {
        Ok(redact_text(&self.read_raw()?))
    }

    /// Overwrites the file with `doc`.
    pub fn save(&self, doc: &ConfigDocument) -> Result<(), PanelError> {
        write_whole(&self.path, &doc.serialize())
    }

    /// Read-modify-write in one call.
    ///
    /// `edit` receives the freshly parsed document.  If it returns `Ok`, the
    /// document is serialized back to disk; if it returns `Err`, nothing is
    /// written and the file stays byte-identical.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use backup_core::{ConfigStore, Provider};
    /// use backup_core::config::remote::create_section;
    ///
    /// let store = ConfigStore::new("/data/rclone.conf");
    /// store.modify(|doc| create_section(doc, "box", Provider::Dropbox, &[]))?;
    /// # Ok::<(), backup_core::PanelError>(())
    /// ```
    pub fn modify<T>(
        &self,
        edit: impl FnOnce(&mut ConfigDocument) -> Result<T, PanelError>,
    ) -> Result<T, PanelError> {
        let mut doc = self.load()?;
        let out = edit(&mut doc)?;
        self.save(&doc)?;
        debug!(path = %self.path.display(), sections = doc.len(), "rclone config rewritten");
        Ok(out)
    }

    /// Replaces the whole file with uploaded `content`.
    ///
    /// If a file already exists it is first copied to
    /// `<path>.bak.YYYYMMDD_HHMMSS` (with `_1`, `_2`, ... appended if that
    /// name is taken).  Backups are never pruned.  Returns the backup path,
    /// if one was made.
    ///
    /// # Errors
    ///
    /// - [`PanelError::InvalidInput`] if `content` is empty or whitespace.
    /// - [`PanelError::Io`] if the backup copy or the write fails; when the
    ///   backup fails the original file is left alone.
    pub fn replace(&self, content: &str) -> Result<Option<PathBuf>, PanelError> {
        if content.trim().is_empty() {
            return Err(PanelError::InvalidInput("Config content is empty".to_string()));
        }

        let backup = if self.path.exists() {
            let backup = self.free_backup_path(&backup_suffix_now());
            std::fs::copy(&self.path, &backup).map_err(|e| PanelError::io(&backup, e))?;
            info!(backup = %backup.display(), "previous rclone config backed up");
            Some(backup)
        } else {
            None
        };

        write_whole(&self.path, content)?;
        info!(path = %self.path.display(), bytes = content.len(), "rclone config replaced");
        Ok(backup)
    }

    fn free_backup_path(&self, suffix: &str) -> PathBuf {
        let base = format!("{}.bak.{suffix}", self.path.display());
        let mut candidate = PathBuf::from(&base);
        let mut n = 1;
        while candidate.exists() {
            candidate = PathBuf::from(format!("{base}_{n}"));
            n += 1;
        }
        candidate
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::provider::Provider;
    use crate::config::remote::{create_section, update_section};

    const REMOTE1: &str = "[remote1]\ntype = onedrive\ntoken = secret123\n";

    fn store_with(content: Option<&str>) -> (tempfile::TempDir, ConfigStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rclone.conf");
        if let Some(content) = content {
            std::fs::write(&path, content).unwrap();
        }
        (dir, ConfigStore::new(path))
    }

    fn backups(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n.starts_with("rclone.conf.bak."))
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_load_missing_file_is_empty_document() {
        let (_dir, store) = store_with(None);
        assert!(store.load().unwrap().is_empty());
        assert_eq!(store.redacted_text().unwrap(), "");
    }

    #[test]
    fn test_redacted_text_hides_token() {
        let (_dir, store) = store_with(Some(REMOTE1));
        let shown = store.redacted_text().unwrap();
        assert!(!shown.contains("secret123"));
        assert!(shown.contains("type = onedrive"));
    }

    #[test]
    fn test_modify_conflict_leaves_file_byte_identical() {
        // Arrange
        let (_dir, store) = store_with(Some(REMOTE1));

        // Act
        let result = store.modify(|doc| create_section(doc, "remote1", Provider::Dropbox, &[]));

        // Assert
        assert!(matches!(result, Err(PanelError::Conflict(_))));
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), REMOTE1);
    }

    #[test]
    fn test_modify_writes_back_unredacted_secrets() {
        let (_dir, store) = store_with(Some(REMOTE1));

        store
            .modify(|doc| {
                update_section(doc, "remote1", &[("drive_type".into(), "business".into())])
            })
            .unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            text,
            "[remote1]\ntype = onedrive\ntoken = secret123\ndrive_type = business\n"
        );
    }

    #[test]
    fn test_modify_creates_missing_file() {
        let (_dir, store) = store_with(None);
        store
            .modify(|doc| create_section(doc, "box", Provider::Dropbox, &[]))
            .unwrap();
        assert_eq!(
            std::fs::read_to_string(store.path()).unwrap(),
            "[box]\ntype = dropbox\n"
        );
    }

    #[test]
    fn test_replace_backs_up_previous_content() {
        // Arrange
        let (dir, store) = store_with(Some(REMOTE1));

        // Act
        let backup = store.replace("[new]\ntype = s3\n").unwrap().unwrap();

        // Assert
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), REMOTE1);
        assert_eq!(
            std::fs::read_to_string(store.path()).unwrap(),
            "[new]\ntype = s3\n"
        );
        assert_eq!(backups(dir.path()).len(), 1);
    }

    #[test]
    fn test_replace_twice_keeps_both_backups() {
        let (dir, store) = store_with(Some(REMOTE1));
        store.replace("[a]\n").unwrap();
        store.replace("[b]\n").unwrap();
        assert_eq!(backups(dir.path()).len(), 2);
    }

    #[test]
    fn test_replace_without_existing_file_makes_no_backup() {
        let (dir, store) = store_with(None);
        assert!(store.replace("[a]\n").unwrap().is_none());
        assert!(backups(dir.path()).is_empty());
    }

    #[test]
    fn test_replace_rejects_blank_content() {
        let (_dir, store) = store_with(Some(REMOTE1));
        assert!(matches!(
            store.replace("  \n\t"),
            Err(PanelError::InvalidInput(_))
        ));
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), REMOTE1);
    }

    #[test]
    fn test_backup_name_has_timestamp_suffix() {
        let (dir, store) = store_with(Some(REMOTE1));
        store.replace("[a]\n").unwrap();
        let name = backups(dir.path()).remove(0);
        let suffix = name.trim_start_matches("rclone.conf.bak.");
        assert_eq!(suffix.len(), 15, "got {name}");
        assert_eq!(&suffix[8..9], "_");
    }
}
