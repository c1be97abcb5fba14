//! Cloud providers the panel can create remotes for.
//!
//! Each provider has a field template: the keys that must be supplied and the
//! keys that are written only when the caller gives them a value.  The `type`
//! key is always written first and comes from [`Provider::rclone_type`].
//!
//! | provider | required        | optional                                                 |
//! |----------|-----------------|----------------------------------------------------------|
//! | onedrive | token           | drive_type, drive_id                                     |
//! | gdrive   |                 | token, root_folder_id                                    |
//! | dropbox  |                 | token                                                    |
//! | s3       | provider        | access_key_id, secret_access_key, region, endpoint, acl  |
//! | sftp     |                 | host, port, user, pass, key_file                         |
//! | webdav   |                 | url, vendor, user, pass                                  |

use std::fmt;

use crate::error::PanelError;

/// A supported cloud provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    OneDrive,
    GDrive,
    Dropbox,
    S3,
    Sftp,
    WebDav,
}

impl Provider {
    /// Every supported provider, in the order the UI lists them.
    pub const ALL: [Provider; 6] = [
        Provider::OneDrive,
        Provider::GDrive,
        Provider::Dropbox,
        Provider::S3,
        Provider::Sftp,
        Provider::WebDav,
    ];

    /// Looks up a provider by its panel tag.
    ///
    /// rclone's own type names are accepted too, so `"drive"` resolves to
    /// [`Provider::GDrive`].
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::InvalidInput`] for an unknown tag.
    pub fn from_tag(tag: &str) -> Result<Self, PanelError> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.tag().eq_ignore_ascii_case(tag) || p.rclone_type().eq_ignore_ascii_case(tag))
            .ok_or_else(|| PanelError::InvalidInput(format!("Unsupported provider \"{tag}\"")))
    }

    /// The tag used by the panel and stored in job records.
    pub fn tag(self) -> &'static str {
        match self {
            Provider::OneDrive => "onedrive",
            Provider::GDrive => "gdrive",
            Provider::Dropbox => "dropbox",
            Provider::S3 => "s3",
            Provider::Sftp => "sftp",
            Provider::WebDav => "webdav",
        }
    }

    /// Value of the `type` key rclone expects for this provider.
    pub fn rclone_type(self) -> &'static str {
        match self {
            Provider::GDrive => "drive",
            other => other.tag(),
        }
    }

    /// Keys (besides `type`) that must be supplied on create.
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            Provider::OneDrive => &["token"],
            Provider::S3 => &["provider"],
            Provider::GDrive | Provider::Dropbox | Provider::Sftp | Provider::WebDav => &[],
        }
    }

    /// Keys written only when the caller supplies a non-empty value.
    pub fn optional_fields(self) -> &'static [&'static str] {
        match self {
            Provider::OneDrive => &["drive_type", "drive_id"],
            Provider::GDrive => &["token", "root_folder_id"],
            Provider::Dropbox => &["token"],
            Provider::S3 => &[
                "access_key_id",
                "secret_access_key",
                "region",
                "endpoint",
                "acl",
            ],
            Provider::Sftp => &["host", "port", "user", "pass", "key_file"],
            Provider::WebDav => &["url", "vendor", "user", "pass"],
        }
    }

    /// Value written for an optional field the caller left out, if any.
    ///
    /// OneDrive remotes default to a personal drive.
    pub fn default_value(self, field: &str) -> Option<&'static str> {
        match (self, field) {
            (Provider::OneDrive, "drive_type") => Some("personal"),
            _ => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Checks that an OAuth `token` value is a JSON object, the only form rclone
/// accepts.
///
/// # Errors
///
/// Returns [`PanelError::InvalidInput`] when the value is not valid JSON or is
/// valid JSON of another shape.
pub fn validate_token(token: &str) -> Result<(), PanelError> {
    match serde_json::from_str::<serde_json::Value>(token) {
        Ok(serde_json::Value::Object(_)) => Ok(()),
        Ok(_) => Err(PanelError::InvalidInput(
            "Token must be a JSON object".to_string(),
        )),
        Err(e) => Err(PanelError::InvalidInput(format!("Malformed token: {e}"))),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag_accepts_panel_tags() {
        for provider in Provider::ALL {
            assert_eq!(Provider::from_tag(provider.tag()).unwrap(), provider);
        }
    }

    #[test]
    fn test_from_tag_accepts_rclone_type_for_gdrive() {
        assert_eq!(Provider::from_tag("drive").unwrap(), Provider::GDrive);
    }

    #[test]
    fn test_from_tag_unknown_is_invalid_input() {
        let err = Provider::from_tag("ftp-ish").unwrap_err();
        assert!(matches!(err, PanelError::InvalidInput(_)));
    }

    #[test]
    fn test_gdrive_maps_to_drive_type() {
        assert_eq!(Provider::GDrive.rclone_type(), "drive");
        assert_eq!(Provider::S3.rclone_type(), "s3");
    }

    #[test]
    fn test_templates_match_provider_table() {
        assert_eq!(Provider::OneDrive.required_fields(), &["token"]);
        assert_eq!(Provider::S3.required_fields(), &["provider"]);
        assert!(Provider::Sftp.optional_fields().contains(&"key_file"));
        assert!(Provider::WebDav.optional_fields().contains(&"vendor"));
    }

    #[test]
    fn test_onedrive_drive_type_default() {
        assert_eq!(Provider::OneDrive.default_value("drive_type"), Some("personal"));
        assert_eq!(Provider::OneDrive.default_value("drive_id"), None);
        assert_eq!(Provider::Dropbox.default_value("drive_type"), None);
    }

    #[test]
    fn test_validate_token_accepts_json_object() {
        assert!(validate_token(r#"{"access_token":"a","expiry":"2030-01-01T00:00:00Z"}"#).is_ok());
    }

    #[test]
    fn test_validate_token_rejects_non_object_and_garbage() {
        assert!(matches!(
            validate_token("\"just a string\""),
            Err(PanelError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_token("not json at all"),
            Err(PanelError::InvalidInput(_))
        ));
    }
}
