//! Cloud remotes: listing, point edits of `rclone.conf`, connection tests and
//! the raw-config view/upload.
//!
//! Listing asks the rclone daemon first, because it reflects what rclone has
//! actually loaded.  Edits always go straight to the config file through
//! [`ConfigStore::modify`], so a rejected edit leaves the file untouched.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use backup_core::config::remote::{create_section, delete_section, update_section, TYPE_KEY};
use backup_core::domain::name::validate_name;
use backup_core::{ConfigStore, PanelError, Provider};

use crate::application::ports::{RemoteControl, SystemTools};
use crate::domain::messages::{CreateRemoteRequest, RemoteSummary, UpdateRemoteRequest};

/// Shown after a successful upload.  rclone reads its config at start-up.
pub const UPLOAD_MESSAGE: &str =
    "rclone config saved. Restart the add-on for changes to take effect.";

/// Type shown for a remote whose type could not be determined.
const UNKNOWN_TYPE: &str = "?";

pub struct RemotesUseCase {
    config: ConfigStore,
    rc: Arc<dyn RemoteControl>,
    tools: Arc<dyn SystemTools>,
}

impl RemotesUseCase {
    pub fn new(config: ConfigStore, rc: Arc<dyn RemoteControl>, tools: Arc<dyn SystemTools>) -> Self {
        Self { config, rc, tools }
    }

    /// Every configured remote with its backend type.
    ///
    /// Uses `config/listremotes` and one `config/get` per remote.  If the
    /// daemon cannot be reached the config file is read instead.
    ///
    /// # Errors
    ///
    /// Only [`PanelError::Io`], when the fallback read fails.
    pub async fn list(&self) -> Result<Vec<RemoteSummary>, PanelError> {
        let listed = match self.rc.call("config/listremotes", json!({})).await {
            Ok(listed) => listed,
            Err(e) => {
                warn!(error = %e, "rclone RC unavailable; listing remotes from config file");
                return self.list_from_file();
            }
        };

        let names: Vec<String> = listed
            .get("remotes")
            .and_then(Value::as_array)
            .map(|remotes| {
                remotes
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|name| name.trim_end_matches(':').to_string())
                    .collect()
            })
            .unwrap_or_default();

        let mut remotes = Vec::with_capacity(names.len());
        for name in names {
            let kind = match self.rc.call("config/get", json!({ "name": name })).await {
                Ok(section) => section
                    .get(TYPE_KEY)
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string(),
                Err(e) => {
                    debug!(remote = %name, error = %e, "config/get failed");
                    UNKNOWN_TYPE.to_string()
                }
            };
            remotes.push(RemoteSummary { name, kind });
        }
        Ok(remotes)
    }

    fn list_from_file(&self) -> Result<Vec<RemoteSummary>, PanelError> {
        let doc = self.config.load()?;
        Ok(doc
            .sections()
            .map(|section| RemoteSummary {
                name: section.name().to_string(),
                kind: section.get(TYPE_KEY).unwrap_or(UNKNOWN_TYPE).to_string(),
            })
            .collect())
    }

    /// Adds a remote built from the provider's field template.
    ///
    /// # Errors
    ///
    /// - [`PanelError::InvalidInput`] for a missing name or provider, an
    ///   unknown provider, or a bad field.
    /// - [`PanelError::Conflict`] if the name is taken.
    pub fn create(&self, request: &CreateRemoteRequest) -> Result<String, PanelError> {
        let name = request.name.trim();
        let tag = request.provider.trim();
        if name.is_empty() || tag.is_empty() {
            return Err(PanelError::InvalidInput(
                "Name and provider are required".to_string(),
            ));
        }
        let provider = Provider::from_tag(tag)?;
        let fields = request.field_set();

        self.config
            .modify(|doc| create_section(doc, name, provider, &fields))?;

        info!(remote = name, kind = provider.rclone_type(), "remote created");
        Ok(format!("Remote \"{name}\" ({}) created", provider.rclone_type()))
    }

    /// Sets, overwrites or (with an empty value) removes fields of a remote.
    pub fn update(&self, name: &str, request: &UpdateRemoteRequest) -> Result<String, PanelError> {
        let fields = request.field_set();
        self.config
            .modify(|doc| update_section(doc, name, &fields))?;
        info!(remote = name, fields = fields.len(), "remote updated");
        Ok(format!("Remote \"{name}\" updated"))
    }

    pub fn delete(&self, name: &str) -> Result<(), PanelError> {
        self.config.modify(|doc| delete_section(doc, name))?;
        info!(remote = name, "remote deleted");
        Ok(())
    }

    /// Runs `rclone about` against the remote and returns its report.
    ///
    /// # Errors
    ///
    /// - [`PanelError::InvalidInput`] if `name` could not be a remote name
    ///   (it is passed to rclone as an argument).
    /// - [`PanelError::Upstream`] when rclone fails or times out.
    pub async fn test(&self, name: &str) -> Result<Value, PanelError> {
        validate_name("Remote", name)?;
        self.tools.remote_about(name).await
    }

    /// The config file with secrets masked; `""` when there is no file.
    pub fn config_text(&self) -> Result<String, PanelError> {
        self.config.redacted_text()
    }

    /// Replaces the whole config file, keeping a timestamped backup.
    pub fn upload_config(&self, content: &str) -> Result<&'static str, PanelError> {
        self.config.replace(content)?;
        Ok(UPLOAD_MESSAGE)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
