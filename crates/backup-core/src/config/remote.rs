//! Point edits of a single remote section.
//!
//! These functions mutate a [`ConfigDocument`] in memory.  They are meant to
//! run inside [`crate::store::ConfigStore::modify`], which rewrites the file
//! only when the edit succeeds, so a rejected edit never touches the disk.

use crate::config::document::{ConfigDocument, Section};
use crate::config::provider::{validate_token, Provider};
use crate::domain::name::validate_name;
use crate::error::PanelError;

/// Caller-supplied `(key, value)` pairs for a create or update.
pub type FieldSet = Vec<(String, String)>;

/// The key every remote carries and no update may remove.
pub const TYPE_KEY: &str = "type";

/// Appends a new remote built from `provider`'s field template.
///
/// The section gets `type` first, then the required fields, then whichever
/// optional fields were supplied (or have a provider default).  Fields that
/// are not part of the template are ignored.
///
/// # Errors
///
/// - [`PanelError::InvalidInput`] for a bad name, a missing required field,
///   a value containing a line break, or a malformed `token`.
/// - [`PanelError::Conflict`] if a section called `name` already exists.
pub fn create_section(
    doc: &mut ConfigDocument,
    name: &str,
    provider: Provider,
    fields: &[(String, String)],
) -> Result<(), PanelError> {
    let name = name.trim();
    validate_name("Remote", name)?;
    if doc.contains(name) {
        return Err(PanelError::Conflict(format!(
            "Remote \"{name}\" already exists"
        )));
    }

    let mut section = Section::new(name);
    section.set(TYPE_KEY, provider.rclone_type());

    for field in provider.required_fields() {
        let value = supplied(fields, field).ok_or_else(|| {
            PanelError::InvalidInput(format!(
                "Field \"{field}\" is required for {provider} remotes"
            ))
        })?;
        check_value(field, value)?;
        section.set(*field, value);
    }

    for field in provider.optional_fields() {
        let value = supplied(fields, field).or_else(|| provider.default_value(field));
        if let Some(value) = value {
            check_value(field, value)?;
            section.set(*field, value);
        }
    }

    doc.push_section(section);
    Ok(())
}

/// Applies `fields` to an existing remote.
///
/// A non-empty value sets or overwrites its key.  An empty value deletes the
/// key, except `type`, which is immutable: it can neither be removed nor
/// changed to a different value.
///
/// # Errors
///
/// - [`PanelError::NotFound`] if there is no section called `name`.
/// - [`PanelError::InvalidInput`] for a malformed key or value, an attempt to
///   change `type`, or a malformed `token`.
pub fn update_section(
    doc: &mut ConfigDocument,
    name: &str,
    fields: &[(String, String)],
) -> Result<(), PanelError> {
    let section = doc
        .section_mut(name)
        .ok_or_else(|| PanelError::NotFound(format!("Remote \"{name}\" not found")))?;

    // Validate everything before the first write so a rejected update leaves
    // the in-memory section untouched as well.
    for (key, value) in fields {
        let key = key.trim();
        check_key(key)?;
        let value = value.trim();
        if key == TYPE_KEY && !value.is_empty() && section.get(TYPE_KEY) != Some(value) {
            return Err(PanelError::InvalidInput(
                "The type of a remote cannot be changed".to_string(),
            ));
        }
        if !value.is_empty() {
            check_value(key, value)?;
        }
    }

    for (key, value) in fields {
        let (key, value) = (key.trim(), value.trim());
        if key == TYPE_KEY {
            continue;
        }
        if value.is_empty() {
            section.remove(key);
        } else {
            section.set(key, value);
        }
    }
    Ok(())
}

/// Removes a remote, returning the removed section.
///
/// # Errors
///
/// Returns [`PanelError::NotFound`] if there is no section called `name`.
pub fn delete_section(doc: &mut ConfigDocument, name: &str) -> Result<Section, PanelError> {
    doc.remove_section(name)
        .ok_or_else(|| PanelError::NotFound(format!("Remote \"{name}\" not found")))
}

/// Returns the trimmed, non-empty value supplied for `key`.
fn supplied<'a>(fields: &'a [(String, String)], key: &str) -> Option<&'a str> {
    fields
        .iter()
        .find(|(k, _)| k.trim() == key)
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
}

fn check_key(key: &str) -> Result<(), PanelError> {
    let valid = !key.is_empty()
        && !key.starts_with('[')
        && !key.contains(&['=', '\n', '\r'][..]);
    if valid {
        Ok(())
    } else {
        Err(PanelError::InvalidInput(format!("Invalid field name \"{key}\"")))
    }
}

fn check_value(key: &str, value: &str) -> Result<(), PanelError> {
    if value.contains(&['\n', '\r'][..]) {
        return Err(PanelError::InvalidInput(format!(
            "Field \"{key}\" must be a single line"
        )));
    }
    if key == "token" {
        validate_token(value)?;
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
