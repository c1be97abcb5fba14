//! HTTP client for the rclone remote-control API.
//!
//! The daemon is started by the add-on with `rclone rcd` on loopback.  Every
//! call is a `POST {base}/{endpoint}` with a JSON body, answered with JSON.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use backup_core::PanelError;

use crate::application::ports::RemoteControl;

/// [`RemoteControl`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRemoteControl {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRemoteControl {
    /// Builds a client whose every request gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// Fails only if the underlying HTTP client cannot be initialised.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

#[async_trait]
impl RemoteControl for HttpRemoteControl {
    async fn call(&self, endpoint: &str, params: Value) -> Result<Value, PanelError> {
        let url = self.url(endpoint);
        debug!(%url, "RC call");

        let response = self
            .client
            .post(&url)
            .json(&params)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PanelError::upstream(format!(
                "RC error {}: {body}",
                status.as_u16()
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| PanelError::upstream(format!("RC returned invalid JSON: {e}")))
    }
}

fn transport_error(e: reqwest::Error) -> PanelError {
    if e.is_timeout() {
        PanelError::upstream_timeout(format!("RC request timed out: {e}"))
    } else {
        PanelError::upstream(format!("RC request failed: {e}"))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
