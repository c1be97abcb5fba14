//! Integration tests for the rclone config document and the file-backed
//! stores, exercised through the public API only.

use backup_core::config::remote::{create_section, delete_section, update_section};
use backup_core::domain::job::{create_job, delete_job, NewJob};
use backup_core::{redact_text, ConfigDocument, ConfigStore, JobStore, PanelError, Provider};

const TWO_REMOTES: &str = "\
[remote1]
type = onedrive
token = {\"access_token\":\"abc\"}
drive_type = personal

[s3box]
type = s3
provider = AWS
secret_access_key = hunter2
region = eu-west-1
";

fn fields(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn new_job(name: &str) -> NewJob {
    NewJob {
        name: name.to_string(),
        remote_name: "remote1".to_string(),
        backup_path: format!("/media/backup/{name}"),
        ..NewJob::default()
    }
}

// ── Document properties ───────────────────────────────────────────────────────

#[test]
fn test_canonical_text_roundtrips_byte_for_byte() {
    let doc = ConfigDocument::parse(TWO_REMOTES);
    assert_eq!(doc.serialize(), TWO_REMOTES);
}

#[test]
fn test_reparse_of_serialized_document_is_equal() {
    let messy = "junk before header\n[ a ]\nx=1\n  y =  2 \nnot a pair\n\n\n[b]\nz= 3\n[a]\nw = 4\n";

    let once = ConfigDocument::parse(messy);
    let twice = ConfigDocument::parse(&once.serialize());

    assert_eq!(once, twice);
}

#[test]
fn test_section_and_key_order_survive_roundtrip() {
    let doc = ConfigDocument::parse("[zeta]\nb = 1\na = 2\n\n[alpha]\nc = 3\n");
    let reparsed = ConfigDocument::parse(&doc.serialize());

    assert_eq!(reparsed.names(), vec!["zeta", "alpha"]);
    let keys: Vec<&str> = reparsed.section("zeta").unwrap().iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["b", "a"]);
}

#[test]
fn test_redaction_hides_every_secret_and_keeps_line_count() {
    let shown = redact_text(TWO_REMOTES);

    assert!(!shown.contains("access_token"));
    assert!(!shown.contains("hunter2"));
    assert!(shown.contains("region = eu-west-1"));
    assert_eq!(shown.lines().count(), TWO_REMOTES.lines().count());
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[test]
fn test_parse_then_redact_single_remote() {
    // Arrange
    let text = "[remote1]\ntype = onedrive\ntoken = secret123\n";

    // Act
    let doc = ConfigDocument::parse(text);
    let shown = redact_text(text);

    // Assert
    let section = doc.section("remote1").unwrap();
    assert_eq!(section.get("type"), Some("onedrive"));
    assert_eq!(section.get("token"), Some("secret123"));
    assert_eq!(shown, "[remote1]\ntype = onedrive\ntoken = [REDACTED]\n");
}

#[test]
fn test_duplicate_create_leaves_file_byte_identical() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let store = ConfigStore::new(dir.path().join("rclone.conf"));
    std::fs::write(store.path(), TWO_REMOTES).unwrap();

    // Act
    let result = store.modify(|doc| {
        create_section(
            doc,
            "remote1",
            Provider::OneDrive,
            &fields(&[("token", "{}")]),
        )
    });

    // Assert
    assert!(matches!(result, Err(PanelError::Conflict(_))));
    assert_eq!(std::fs::read_to_string(store.path()).unwrap(), TWO_REMOTES);
}

#[test]
fn test_delete_unknown_job_keeps_all_jobs() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let store = JobStore::new(dir.path().join("jobs.json"));
    store
        .modify(|jobs| {
            for (i, name) in ["a", "b", "c"].iter().enumerate() {
                create_job(jobs, new_job(name), format!("id{i}"), "t".into())?;
            }
            Ok(())
        })
        .unwrap();

    // Act
    let result = store.modify(|jobs| delete_job(jobs, "does-not-exist"));

    // Assert
    assert!(matches!(result, Err(PanelError::NotFound(_))));
    assert_eq!(store.load().unwrap().len(), 3);
}

// ── Full remote lifecycle through the store ───────────────────────────────────

#[test]
fn test_remote_create_update_delete_through_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = ConfigStore::new(dir.path().join("rclone.conf"));
    std::fs::write(store.path(), TWO_REMOTES).unwrap();

    store
        .modify(|doc| {
            create_section(
                doc,
                "gd",
                Provider::GDrive,
                &fields(&[("root_folder_id", "xyz"), ("bogus", "ignored")]),
            )
        })
        .unwrap();
    store
        .modify(|doc| update_section(doc, "s3box", &fields(&[("region", ""), ("acl", "private")])))
        .unwrap();
    store.modify(|doc| delete_section(doc, "remote1")).unwrap();

    assert_eq!(
        std::fs::read_to_string(store.path()).unwrap(),
        "[s3box]\ntype = s3\nprovider = AWS\nsecret_access_key = hunter2\nacl = private\n\n\
         [gd]\ntype = drive\nroot_folder_id = xyz\n"
    );
}

#[test]
fn test_upload_replaces_file_and_keeps_backup() {
    let dir = tempfile::tempdir().unwrap();
    let store = ConfigStore::new(dir.path().join("rclone.conf"));
    std::fs::write(store.path(), TWO_REMOTES).unwrap();

    let backup = store.replace("[only]\ntype = sftp\n").unwrap();

    let backup = backup.expect("existing file must be backed up");
    assert_eq!(std::fs::read_to_string(backup).unwrap(), TWO_REMOTES);
    assert_eq!(store.load().unwrap().names(), vec!["only"]);
}
