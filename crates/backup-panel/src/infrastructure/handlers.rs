//! axum handlers for the `/api` routes.
//!
//! Each handler extracts the request, calls one use case and wraps the result
//! in the JSON shape the browser expects.  Failures become an [`ApiError`],
//! which renders as `{"success": false, "error": "..."}` with a status code
//! chosen from the [`PanelError`] variant:
//!
//! | Variant                      | Status |
//! |------------------------------|--------|
//! | `InvalidInput`               | 400    |
//! | `NotFound`                   | 404    |
//! | `Conflict`                   | 409    |
//! | `Upstream` (error reply)     | 502    |
//! | `Upstream` (timed out)       | 504    |
//! | `Io`                         | 500    |
//!
//! Malformed JSON bodies and query strings are reported as `InvalidInput`
//! rather than axum's default plain-text rejection.

use std::convert::Infallible;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderName, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::StreamExt;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use backup_core::{JobPatch, NewJob, PanelError};

use crate::domain::messages::{
    CreateRemoteRequest, LogQuery, StatusReport, TriggerRequest, UpdateRemoteRequest,
    UploadConfigRequest,
};
use crate::infrastructure::http_server::AppState;
use crate::infrastructure::log_stream;

type ApiResult<T = Value> = Result<Json<T>, ApiError>;

// ── Error response ────────────────────────────────────────────────────────────

/// A [`PanelError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub PanelError);

impl From<PanelError> for ApiError {
    fn from(err: PanelError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(PanelError::InvalidInput(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(PanelError::InvalidInput(rejection.body_text()))
    }
}

/// Status code for each error variant.
pub fn status_for(err: &PanelError) -> StatusCode {
    match err {
        PanelError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        PanelError::NotFound(_) => StatusCode::NOT_FOUND,
        PanelError::Conflict(_) => StatusCode::CONFLICT,
        PanelError::Upstream {
            timed_out: true, ..
        } => StatusCode::GATEWAY_TIMEOUT,
        PanelError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        PanelError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            warn!(kind = self.0.kind(), status = status.as_u16(), error = %self.0, "request failed");
        } else {
            debug!(kind = self.0.kind(), status = status.as_u16(), error = %self.0, "request rejected");
        }
        let body = json!({ "success": false, "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

fn success_message(message: impl Into<String>) -> Json<Value> {
    Json(json!({ "success": true, "message": message.into() }))
}

// ── Jobs ──────────────────────────────────────────────────────────────────────

pub async fn list_jobs(State(state): State<AppState>) -> ApiResult {
    let jobs = state.jobs.list()?;
    Ok(Json(json!({ "jobs": jobs })))
}

pub async fn create_job(
    State(state): State<AppState>,
    payload: Result<Json<NewJob>, JsonRejection>,
) -> ApiResult {
    let Json(request) = payload?;
    let job = state.jobs.create(request)?;
    Ok(Json(json!({ "success": true, "job": job })))
}

pub async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<JobPatch>, JsonRejection>,
) -> ApiResult {
    let Json(patch) = payload?;
    let job = state.jobs.update(&id, patch)?;
    Ok(Json(json!({ "success": true, "job": job })))
}

pub async fn delete_job(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    state.jobs.delete(&id)?;
    Ok(Json(json!({ "success": true })))
}

pub async fn trigger(
    State(state): State<AppState>,
    payload: Result<Json<TriggerRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = payload?;
    let message = state.jobs.trigger(&request.name)?;
    Ok(success_message(message))
}

// ── Remotes ───────────────────────────────────────────────────────────────────

pub async fn list_remotes(State(state): State<AppState>) -> ApiResult {
    let remotes = state.remotes.list().await?;
    Ok(Json(json!({ "remotes": remotes })))
}

pub async fn create_remote(
    State(state): State<AppState>,
    payload: Result<Json<CreateRemoteRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = payload?;
    Ok(success_message(state.remotes.create(&request)?))
}

pub async fn update_remote(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<UpdateRemoteRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = payload?;
    Ok(success_message(state.remotes.update(&name, &request)?))
}

pub async fn delete_remote(State(state): State<AppState>, Path(name): Path<String>) -> ApiResult {
    state.remotes.delete(&name)?;
    Ok(Json(json!({ "success": true })))
}

/// `rclone about` against the remote; the quota JSON comes back as `info`.
pub async fn test_remote(State(state): State<AppState>, Path(name): Path<String>) -> ApiResult {
    let info = state.remotes.test(&name).await?;
    Ok(Json(json!({ "success": true, "info": info })))
}

pub async fn get_rclone_config(State(state): State<AppState>) -> ApiResult {
    let content = state.remotes.config_text()?;
    Ok(Json(json!({ "content": content })))
}

pub async fn upload_rclone_config(
    State(state): State<AppState>,
    payload: Result<Json<UploadConfigRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = payload?;
    Ok(success_message(state.remotes.upload_config(&request.content)?))
}

// ── Status and logs ───────────────────────────────────────────────────────────

pub async fn status(State(state): State<AppState>) -> ApiResult<StatusReport> {
    Ok(Json(state.status.report().await?))
}

pub async fn list_logs(State(state): State<AppState>) -> ApiResult {
    let logs = state.logs.list()?;
    Ok(Json(json!({ "logs": logs })))
}

/// `GET /api/logs/<name>` and `GET /api/logs/<name>/stream`.
///
/// `<name>` may contain slashes; only its final component is used to find
/// the file, and the content reply echoes it back as given.
pub async fn log_entry(
    State(state): State<AppState>,
    Path(path): Path<String>,
    query: Result<Query<LogQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    match path.strip_suffix("/stream") {
        Some(name) => stream_log(&state, name),
        None => {
            let Query(query) = query?;
            let content = state.logs.content(&path, query.lines()).await?;
            Ok(Json(content).into_response())
        }
    }
}

/// Server-Sent Events: one `data:` event per line appended to the log.
///
/// The stream ends when the client disconnects (the `tail -f` is killed with
/// it) or when the server begins shutting down.
fn stream_log(state: &AppState, name: &str) -> Result<Response, ApiError> {
    let path = state.logs.resolve(name)?;
    let follower = log_stream::follow(&state.tail_bin, &path)?;
    info!(log = %path.display(), "streaming log");

    let mut shutdown = state.shutdown.subscribe();
    let stopped = async move {
        let sender_gone = shutdown.wait_for(|stop| *stop).await.is_err();
        if sender_gone {
            std::future::pending::<()>().await;
        }
    };

    let events = follower
        .into_stream()
        .take_until(stopped)
        .map(|line| Ok::<_, Infallible>(Event::default().data(line)));

    let headers = [
        (header::CACHE_CONTROL, "no-cache"),
        (HeaderName::from_static("x-accel-buffering"), "no"),
    ];
    Ok((headers, Sse::new(events).keep_alive(KeepAlive::default())).into_response())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
