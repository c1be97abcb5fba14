//! Naming rule for remotes and jobs.
//!
//! Remote names become `[section]` headers that rclone parses, and job names
//! end up in file names (`trigger_<name>`).  Both therefore use the same
//! conservative character set: ASCII letters and digits, `_`, `-`, `.`, `+`,
//! `@` and space.  A name may not start with `-` or a space (rclone would
//! read it as a flag or trim it) and may not end with a space.

use crate::error::PanelError;

/// Checks `name` against the naming rule.
///
/// `what` names the thing being validated (`"Remote"`, `"Job"`) and is only
/// used to build the error message.
///
/// # Errors
///
/// Returns [`PanelError::InvalidInput`] describing the first problem found.
pub fn validate_name(what: &str, name: &str) -> Result<(), PanelError> {
    if name.is_empty() {
        return Err(PanelError::InvalidInput(format!("{what} name is required")));
    }
    if let Some(bad) = name.chars().find(|c| !is_name_char(*c)) {
        return Err(PanelError::InvalidInput(format!(
            "{what} name \"{name}\" contains disallowed character '{bad}'"
        )));
    }
    if name.starts_with(&['-', ' '][..]) || name.ends_with(' ') {
        return Err(PanelError::InvalidInput(format!(
            "{what} name \"{name}\" must not start with '-' or a space, or end with a space"
        )));
    }
    Ok(())
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+' | '@' | ' ')
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_typical_names() {
        for name in ["remote1", "OneDrive Work", "my-bucket.eu", "a+b@c", "_x"] {
            assert!(validate_name("Remote", name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(
            validate_name("Job", ""),
            Err(PanelError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_path_and_bracket_characters() {
        for name in ["../etc", "a/b", "a\\b", "x]y", "[x", "tab\there", "ünï"] {
            assert!(validate_name("Job", name).is_err(), "{name:?} should be rejected");
        }
    }

    #[test]
    fn test_rejects_leading_dash_or_space_and_trailing_space() {
        assert!(validate_name("Remote", "-flag").is_err());
        assert!(validate_name("Remote", " lead").is_err());
        assert!(validate_name("Remote", "trail ").is_err());
    }

    #[test]
    fn test_error_message_names_the_thing() {
        let err = validate_name("Job", "a/b").unwrap_err();
        assert!(err.to_string().starts_with("Job name"));
    }
}
