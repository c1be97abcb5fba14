//! Backup jobs: the records stored in `jobs.json` and the rules for editing
//! the list.
//!
//! A job pairs an rclone remote (by name) with a local destination path, plus
//! exclude patterns and an optional weekly schedule.  The remote name is a
//! soft reference: nothing stops a job from naming a remote that does not
//! exist (yet).
//!
//! The list functions below work on a plain `Vec<BackupJob>` so they can run
//! inside [`crate::store::JobStore::modify`] and be tested without files.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::provider::Provider;
use crate::domain::clock::local_iso_now;
use crate::domain::name::validate_name;
use crate::error::PanelError;

/// Day names accepted in `schedule_days`, Monday first.
pub const WEEKDAYS: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

/// One persisted backup job.
///
/// Field order is the order written to `jobs.json`.  Files written before the
/// schedule fields existed still load: missing fields take their defaults.
/// Loading is lenient about scalar types (`"enabled": "true"`, a number for
/// `id`, a bare string for `excludes`) so that hand-edited or older files are
/// read rather than rejected; the next save writes the canonical types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupJob {
    /// Eight hex characters, random.
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    /// Unique, human-chosen name.  Also used for the trigger file name.
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    /// Provider tag (`onedrive`, `gdrive`, ...).
    #[serde(default = "default_provider", deserialize_with = "lenient::string")]
    pub cloud_provider: String,
    /// Name of the rclone remote to copy from.
    #[serde(default, deserialize_with = "lenient::string")]
    pub remote_name: String,
    /// Absolute local destination directory.
    #[serde(default, deserialize_with = "lenient::string")]
    pub backup_path: String,
    /// rclone `--exclude` patterns.
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub excludes: Vec<String>,
    /// `HH:MM`, 24-hour local time.
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub schedule_time: Option<String>,
    /// Lowercase three-letter day names.
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub schedule_days: Vec<String>,
    #[serde(default = "default_true", deserialize_with = "lenient::flag")]
    pub enabled: bool,
    /// Local-time ISO-8601 creation timestamp.
    #[serde(default, deserialize_with = "lenient::string")]
    pub created: String,
}

/// Body of a create request.  Missing fields deserialize to empty values and
/// are then rejected or defaulted by [`create_job`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewJob {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cloud_provider: Option<String>,
    #[serde(default)]
    pub remote_name: String,
    #[serde(default)]
    pub backup_path: String,
    #[serde(default)]
    pub excludes: Vec<String>,
    #[serde(default)]
    pub schedule_time: Option<String>,
    #[serde(default)]
    pub schedule_days: Vec<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// Body of an update request.  `None` leaves a field unchanged;
/// `schedule_time: Some("")` clears the schedule time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobPatch {
    pub name: Option<String>,
    pub cloud_provider: Option<String>,
    pub remote_name: Option<String>,
    pub backup_path: Option<String>,
    pub excludes: Option<Vec<String>>,
    pub schedule_time: Option<String>,
    pub schedule_days: Option<Vec<String>>,
    pub enabled: Option<bool>,
}

fn default_provider() -> String {
    Provider::OneDrive.tag().to_string()
}

fn default_true() -> bool {
    true
}

/// Deserializers that accept whatever scalar shape a stored job carries.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn text(value: Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(text(Value::deserialize(d)?).unwrap_or_default())
    }

    pub fn optional_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(text(Value::deserialize(d)?))
    }

    /// An array keeps its non-null items; a lone non-empty string becomes a
    /// one-item list.
    pub fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items.into_iter().filter_map(text).collect(),
            other => text(other).filter(|s| !s.is_empty()).into_iter().collect(),
        })
    }

    /// `null` counts as unset (enabled); strings other than the usual
    /// spellings of "no" count as yes.
    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Bool(b) => b,
            Value::Null => true,
            Value::Number(n) => n.as_f64() != Some(0.0),
            Value::String(s) => !matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "false" | "0" | "no" | "off" | ""
            ),
            Value::Array(_) | Value::Object(_) => true,
        })
    }
}

// ── List operations ───────────────────────────────────────────────────────────

/// Returns the job called `name`, if any.
pub fn find_by_name<'a>(jobs: &'a [BackupJob], name: &str) -> Option<&'a BackupJob> {
    jobs.iter().find(|j| j.name == name)
}

/// A fresh job id: the first eight hex digits of a random UUID.
pub fn new_job_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

/// Validates `request` and appends the resulting job.
///
/// `id` and `created` are passed in so tests can pin them; production code
/// calls [`create_job_now`].
///
/// # Errors
///
/// - [`PanelError::InvalidInput`] when name, remote or backup path is missing
///   or any field fails validation.
/// - [`PanelError::Conflict`] when another job already uses the name.
pub fn create_job(
    jobs: &mut Vec<BackupJob>,
    request: NewJob,
    id: String,
    created: String,
) -> Result<BackupJob, PanelError> {
    let name = request.name.trim();
    let remote_name = request.remote_name.trim();
    let backup_path = request.backup_path.trim();

    if name.is_empty() || remote_name.is_empty() || backup_path.is_empty() {
        return Err(PanelError::InvalidInput(
            "Name, remote, and backup path are required".to_string(),
        ));
    }
    validate_name("Job", name)?;
    check_backup_path(backup_path)?;
    if find_by_name(jobs, name).is_some() {
        return Err(PanelError::Conflict(format!("Job \"{name}\" already exists")));
    }

    let cloud_provider = match request.cloud_provider.as_deref().map(str::trim) {
        Some(tag) if !tag.is_empty() => Provider::from_tag(tag)?.tag().to_string(),
        _ => default_provider(),
    };

    let job = BackupJob {
        id,
        name: name.to_string(),
        cloud_provider,
        remote_name: remote_name.to_string(),
        backup_path: backup_path.to_string(),
        excludes: clean_excludes(request.excludes),
        schedule_time: clean_schedule_time(request.schedule_time)?,
        schedule_days: clean_schedule_days(request.schedule_days)?,
        enabled: request.enabled.unwrap_or(true),
        created,
    };
    jobs.push(job.clone());
    Ok(job)
}

/// [`create_job`] with a random id and the current local time.
pub fn create_job_now(jobs: &mut Vec<BackupJob>, request: NewJob) -> Result<BackupJob, PanelError> {
    create_job(jobs, request, new_job_id(), local_iso_now())
}

/// Applies `patch` to the job with `id` and returns the updated job.
///
/// All fields are validated before anything changes.
///
/// # Errors
///
/// - [`PanelError::NotFound`] for an unknown id.
/// - [`PanelError::InvalidInput`] for an invalid field.
/// - [`PanelError::Conflict`] when renaming onto another job's name.
pub fn update_job(
    jobs: &mut [BackupJob],
    id: &str,
    patch: JobPatch,
) -> Result<BackupJob, PanelError> {
    let index = jobs
        .iter()
        .position(|j| j.id == id)
        .ok_or_else(|| PanelError::NotFound("Job not found".to_string()))?;

    let name = match patch.name.as_deref().map(str::trim) {
        Some(name) => {
            validate_name("Job", name)?;
            if jobs.iter().any(|j| j.id != id && j.name == name) {
                return Err(PanelError::Conflict(format!("Job \"{name}\" already exists")));
            }
            Some(name.to_string())
        }
        None => None,
    };
    let cloud_provider = patch
        .cloud_provider
        .as_deref()
        .map(|tag| Provider::from_tag(tag).map(|p| p.tag().to_string()))
        .transpose()?;
    let remote_name = patch
        .remote_name
        .as_deref()
        .map(|r| required("Remote", r))
        .transpose()?;
    let backup_path = patch
        .backup_path
        .as_deref()
        .map(|p| {
            let p = required("Backup path", p)?;
            check_backup_path(&p)?;
            Ok::<_, PanelError>(p)
        })
        .transpose()?;
    let schedule_time = match patch.schedule_time {
        Some(time) => Some(clean_schedule_time(Some(time))?),
        None => None,
    };
    let schedule_days = patch.schedule_days.map(clean_schedule_days).transpose()?;

    let job = &mut jobs[index];
    if let Some(name) = name {
        job.name = name;
    }
    if let Some(cloud_provider) = cloud_provider {
        job.cloud_provider = cloud_provider;
    }
    if let Some(remote_name) = remote_name {
        job.remote_name = remote_name;
    }
    if let Some(backup_path) = backup_path {
        job.backup_path = backup_path;
    }
    if let Some(excludes) = patch.excludes {
        job.excludes = clean_excludes(excludes);
    }
    if let Some(schedule_time) = schedule_time {
        job.schedule_time = schedule_time;
    }
    if let Some(schedule_days) = schedule_days {
        job.schedule_days = schedule_days;
    }
    if let Some(enabled) = patch.enabled {
        job.enabled = enabled;
    }
    Ok(job.clone())
}

/// Removes the job with `id` and returns it.
///
/// # Errors
///
/// Returns [`PanelError::NotFound`] for an unknown id; the list is unchanged.
pub fn delete_job(jobs: &mut Vec<BackupJob>, id: &str) -> Result<BackupJob, PanelError> {
    let index = jobs
        .iter()
        .position(|j| j.id == id)
        .ok_or_else(|| PanelError::NotFound("Job not found".to_string()))?;
    Ok(jobs.remove(index))
}

// ── Field cleaning ────────────────────────────────────────────────────────────

/// Trims every pattern and drops the empty ones.
fn clean_excludes(excludes: Vec<String>) -> Vec<String> {
    excludes
        .into_iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Normalizes `HH:MM`; an empty value means "no time".
fn clean_schedule_time(time: Option<String>) -> Result<Option<String>, PanelError> {
    let Some(time) = time else {
        return Ok(None);
    };
    let time = time.trim();
    if time.is_empty() {
        return Ok(None);
    }
    chrono::NaiveTime::parse_from_str(time, "%H:%M")
        .map(|t| Some(t.format("%H:%M").to_string()))
        .map_err(|_| {
            PanelError::InvalidInput(format!("Schedule time \"{time}\" must be HH:MM"))
        })
}

/// Lowercases day names, rejects unknown ones and drops duplicates.
fn clean_schedule_days(days: Vec<String>) -> Result<Vec<String>, PanelError> {
    let mut cleaned: Vec<String> = Vec::with_capacity(days.len());
    for day in days {
        let day = day.trim().to_ascii_lowercase();
        if !WEEKDAYS.contains(&day.as_str()) {
            return Err(PanelError::InvalidInput(format!(
                "Unknown schedule day \"{day}\" (expected one of {})",
                WEEKDAYS.join(", ")
            )));
        }
        if !cleaned.contains(&day) {
            cleaned.push(day);
        }
    }
    Ok(cleaned)
}

fn required(what: &str, value: &str) -> Result<String, PanelError> {
    let value = value.trim();
    if value.is_empty() {
        Err(PanelError::InvalidInput(format!("{what} must not be empty")))
    } else {
        Ok(value.to_string())
    }
}

fn check_backup_path(path: &str) -> Result<(), PanelError> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(PanelError::InvalidInput(format!(
            "Backup path \"{path}\" must be an absolute path"
        )))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str) -> NewJob {
        NewJob {
            name: name.to_string(),
            remote_name: "onedrive-main".to_string(),
            backup_path: "/media/backup".to_string(),
            ..NewJob::default()
        }
    }

    fn three_jobs() -> Vec<BackupJob> {
        let mut jobs = Vec::new();
        for (i, name) in ["a", "b", "c"].into_iter().enumerate() {
            create_job(&mut jobs, request(name), format!("id{i}"), "t".into()).unwrap();
        }
        jobs
    }

    // ── create ────────────────────────────────────────────────────────────────

    #[test]
    fn test_create_applies_defaults() {
        // Arrange
        let mut jobs = Vec::new();

        // Act
        let job = create_job(&mut jobs, request("photos"), "abcd1234".into(), "now".into()).unwrap();

        // Assert
        assert_eq!(job.id, "abcd1234");
        assert_eq!(job.cloud_provider, "onedrive");
        assert!(job.enabled);
        assert!(job.excludes.is_empty());
        assert_eq!(job.schedule_time, None);
        assert_eq!(job.created, "now");
        assert_eq!(jobs, vec![job]);
    }

    #[test]
    fn test_create_requires_name_remote_and_path() {
        let mut jobs = Vec::new();
        let mut req = request("x");
        req.remote_name = "   ".into();
        let err = create_job(&mut jobs, req, "id".into(), "t".into()).unwrap_err();
        assert!(matches!(err, PanelError::InvalidInput(_)));
        assert!(jobs.is_empty());
    }

    #[test]
    fn test_create_duplicate_name_is_conflict() {
        let mut jobs = three_jobs();
        let err = create_job(&mut jobs, request("b"), "new".into(), "t".into()).unwrap_err();
        assert!(matches!(err, PanelError::Conflict(_)));
        assert_eq!(jobs.len(), 3);
    }

    #[test]
    fn test_create_cleans_excludes_and_schedule() {
        let mut jobs = Vec::new();
        let mut req = request("docs");
        req.excludes = vec!["  *.tmp ".into(), "".into(), "   ".into(), "cache/**".into()];
        req.schedule_time = Some("7:05".into());
        req.schedule_days = vec!["Mon".into(), "fri".into(), "mon".into()];
        req.cloud_provider = Some("drive".into());

        let job = create_job(&mut jobs, req, "id".into(), "t".into()).unwrap();

        assert_eq!(job.excludes, vec!["*.tmp", "cache/**"]);
        assert_eq!(job.schedule_time.as_deref(), Some("07:05"));
        assert_eq!(job.schedule_days, vec!["mon", "fri"]);
        assert_eq!(job.cloud_provider, "gdrive");
    }

    #[test]
    fn test_create_rejects_bad_schedule_values() {
        let mut jobs = Vec::new();
        let mut req = request("x");
        req.schedule_time = Some("25:99".into());
        assert!(create_job(&mut jobs, req, "id".into(), "t".into()).is_err());

        let mut req = request("y");
        req.schedule_days = vec!["someday".into()];
        assert!(create_job(&mut jobs, req, "id".into(), "t".into()).is_err());
    }

    #[test]
    fn test_create_rejects_relative_backup_path() {
        let mut jobs = Vec::new();
        let mut req = request("x");
        req.backup_path = "media/backup".into();
        assert!(matches!(
            create_job(&mut jobs, req, "id".into(), "t".into()),
            Err(PanelError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_create_job_now_generates_short_id() {
        let mut jobs = Vec::new();
        let job = create_job_now(&mut jobs, request("x")).unwrap();
        assert_eq!(job.id.len(), 8);
        assert!(job.id.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(!job.created.is_empty());
    }

    // ── update ────────────────────────────────────────────────────────────────

    #[test]
    fn test_update_changes_only_supplied_fields() {
        // Arrange
        let mut jobs = three_jobs();
        let patch = JobPatch {
            enabled: Some(false),
            excludes: Some(vec![" *.iso ".into()]),
            ..JobPatch::default()
        };

        // Act
        let job = update_job(&mut jobs, "id1", patch).unwrap();

        // Assert
        assert_eq!(job.name, "b");
        assert!(!job.enabled);
        assert_eq!(job.excludes, vec!["*.iso"]);
        assert_eq!(jobs[1], job);
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let mut jobs = three_jobs();
        let err = update_job(&mut jobs, "nope", JobPatch::default()).unwrap_err();
        assert!(matches!(err, PanelError::NotFound(_)));
    }

    #[test]
    fn test_update_rename_onto_other_job_is_conflict() {
        let mut jobs = three_jobs();
        let patch = JobPatch {
            name: Some("a".into()),
            ..JobPatch::default()
        };
        let err = update_job(&mut jobs, "id1", patch).unwrap_err();
        assert!(matches!(err, PanelError::Conflict(_)));
        assert_eq!(jobs[1].name, "b");
    }

    #[test]
    fn test_update_keeping_own_name_is_allowed() {
        let mut jobs = three_jobs();
        let patch = JobPatch {
            name: Some("b".into()),
            ..JobPatch::default()
        };
        assert!(update_job(&mut jobs, "id1", patch).is_ok());
    }

    #[test]
    fn test_update_empty_schedule_time_clears_it() {
        let mut jobs = three_jobs();
        jobs[0].schedule_time = Some("03:00".into());
        let patch = JobPatch {
            schedule_time: Some(String::new()),
            ..JobPatch::default()
        };
        let job = update_job(&mut jobs, "id0", patch).unwrap();
        assert_eq!(job.schedule_time, None);
    }

    #[test]
    fn test_update_invalid_field_changes_nothing() {
        let mut jobs = three_jobs();
        let before = jobs.clone();
        let patch = JobPatch {
            enabled: Some(false),
            backup_path: Some("relative".into()),
            ..JobPatch::default()
        };
        assert!(update_job(&mut jobs, "id0", patch).is_err());
        assert_eq!(jobs, before);
    }

    // ── delete ────────────────────────────────────────────────────────────────

    #[test]
    fn test_delete_unknown_id_keeps_all_three() {
        let mut jobs = three_jobs();
        let err = delete_job(&mut jobs, "missing").unwrap_err();
        assert!(matches!(err, PanelError::NotFound(_)));
        assert_eq!(jobs.len(), 3);
    }

    #[test]
    fn test_delete_removes_job() {
        let mut jobs = three_jobs();
        let removed = delete_job(&mut jobs, "id0").unwrap();
        assert_eq!(removed.name, "a");
        let names: Vec<_> = jobs.iter().map(|j| j.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    // ── serde ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_legacy_record_without_schedule_fields_loads() {
        let json = r#"{"id":"1a2b3c4d","name":"old","cloud_provider":"onedrive",
            "remote_name":"r","backup_path":"/b","excludes":[],"enabled":true,
            "created":"2025-01-01T00:00:00"}"#;
        let job: BackupJob = serde_json::from_str(json).unwrap();
        assert_eq!(job.schedule_time, None);
        assert!(job.schedule_days.is_empty());
    }

    #[test]
    fn test_record_with_loose_scalar_types_loads() {
        // Arrange
        let json = r#"{"id":1234,"name":"loose","remote_name":"r","backup_path":"/b",
            "excludes":"*.tmp","schedule_time":null,"schedule_days":["mon",null],
            "enabled":"true"}"#;

        // Act
        let job: BackupJob = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(job.id, "1234");
        assert_eq!(job.cloud_provider, "onedrive");
        assert_eq!(job.excludes, vec!["*.tmp"]);
        assert_eq!(job.schedule_time, None);
        assert_eq!(job.schedule_days, vec!["mon"]);
        assert!(job.enabled);
    }

    #[test]
    fn test_enabled_flag_spellings() {
        let parse = |value: &str| {
            let json = format!(r#"{{"name":"x","enabled":{value}}}"#);
            serde_json::from_str::<BackupJob>(&json).unwrap().enabled
        };
        assert!(parse("true"));
        assert!(parse("\"yes\""));
        assert!(parse("1"));
        assert!(parse("null"));
        assert!(!parse("false"));
        assert!(!parse("\"False\""));
        assert!(!parse("\"off\""));
        assert!(!parse("0"));
    }

    #[test]
    fn test_serialized_field_order() {
        let mut jobs = Vec::new();
        let job = create_job(&mut jobs, request("x"), "id".into(), "t".into()).unwrap();
        let json = serde_json::to_string(&job).unwrap();
        let keys = [
            "\"id\"",
            "\"name\"",
            "\"cloud_provider\"",
            "\"remote_name\"",
            "\"backup_path\"",
            "\"excludes\"",
            "\"schedule_time\"",
            "\"schedule_days\"",
            "\"enabled\"",
            "\"created\"",
        ];
        let positions: Vec<_> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
    }
}
