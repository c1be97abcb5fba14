//! HTTP server: shared state, route table, listener and shutdown.
//!
//! # How a request flows
//!
//! ```text
//! browser ──► TraceLayer ──► Router ──► handler ──► use case ──► files / RC / tools
//! ```
//!
//! Every handler receives a clone of [`AppState`].  Cloning is cheap: each
//! use case sits behind an `Arc`, and the use cases themselves only hold
//! paths and port handles, so there is no per-request setup.
//!
//! # Shutdown
//!
//! `axum::serve` stops accepting on the shutdown signal and then waits for
//! open connections to finish.  A log stream never finishes by itself, so
//! [`AppState::close_streams`] is called first to end every open stream
//! (and kill its `tail -f`).

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::routing::{get, post, put};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing::info;

use backup_core::{ConfigStore, JobStore};

use crate::application::{
    JobsUseCase, LogsUseCase, RemoteControl, RemotesUseCase, StatusUseCase, SystemTools,
};
use crate::domain::config::PanelConfig;
use crate::infrastructure::handlers;
use crate::infrastructure::process::LocalTools;
use crate::infrastructure::rc_client::HttpRemoteControl;

// ── Shared state ──────────────────────────────────────────────────────────────

/// Everything a handler can reach.
#[derive(Clone)]
pub struct AppState {
    pub remotes: Arc<RemotesUseCase>,
    pub jobs: Arc<JobsUseCase>,
    pub status: Arc<StatusUseCase>,
    pub logs: Arc<LogsUseCase>,
    /// `tail` executable for log streaming.
    pub tail_bin: Arc<PathBuf>,
    /// Flipped to `true` to end every open log stream.
    pub shutdown: Arc<watch::Sender<bool>>,
}

impl AppState {
    /// Wires the use cases to the paths in `config` and the given ports.
    ///
    /// Tests pass stub ports here; production code calls
    /// [`AppState::from_config`].
    pub fn new(
        config: &PanelConfig,
        rc: Arc<dyn RemoteControl>,
        tools: Arc<dyn SystemTools>,
    ) -> Self {
        let jobs = JobStore::new(&config.jobs_file);
        let (shutdown, _) = watch::channel(false);
        Self {
            remotes: Arc::new(RemotesUseCase::new(
                ConfigStore::new(&config.rclone_conf),
                rc,
                Arc::clone(&tools),
            )),
            jobs: Arc::new(JobsUseCase::new(jobs.clone(), &config.data_dir)),
            status: Arc::new(StatusUseCase::new(
                jobs.clone(),
                &config.status_dir,
                Arc::clone(&tools),
            )),
            logs: Arc::new(LogsUseCase::new(jobs, &config.data_dir, tools)),
            tail_bin: Arc::new(config.tail_bin.clone()),
            shutdown: Arc::new(shutdown),
        }
    }

    /// Production wiring: the RC API over HTTP and the real `df`, `tail` and
    /// `rclone` binaries.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &PanelConfig) -> anyhow::Result<Self> {
        let rc = HttpRemoteControl::new(config.rc_url.clone(), config.rc_timeout)
            .context("failed to build rclone RC client")?;
        let tools = LocalTools::from_config(config);
        Ok(Self::new(config, Arc::new(rc), Arc::new(tools)))
    }

    /// Ends every open log stream.  Streams opened afterwards end at once.
    pub fn close_streams(&self) {
        self.shutdown.send_replace(true);
    }
}

// ── Routes ────────────────────────────────────────────────────────────────────

/// The `/api` route table with request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/jobs", get(handlers::list_jobs).post(handlers::create_job))
        .route(
            "/api/jobs/:id",
            put(handlers::update_job).delete(handlers::delete_job),
        )
        .route(
            "/api/remotes",
            get(handlers::list_remotes).post(handlers::create_remote),
        )
        .route(
            "/api/remotes/:name",
            put(handlers::update_remote).delete(handlers::delete_remote),
        )
        .route("/api/remotes/:name/test", post(handlers::test_remote))
        .route(
            "/api/rclone-config",
            get(handlers::get_rclone_config).post(handlers::upload_rclone_config),
        )
        .route("/api/status", get(handlers::status))
        .route("/api/logs", get(handlers::list_logs))
        .route("/api/logs/*path", get(handlers::log_entry))
        .route("/api/trigger", post(handlers::trigger))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Server ────────────────────────────────────────────────────────────────────

/// Binds `config.bind_addr` and serves the panel until `shutdown` completes.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound (port in use, missing
/// permission) or the server fails while running.
pub async fn run_server<F>(config: PanelConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = AppState::from_config(&config)?;
    let streams = state.clone();

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {}", config.bind_addr))?;

    info!(
        addr = %config.bind_addr,
        rclone_conf = %config.rclone_conf.display(),
        jobs_file = %config.jobs_file.display(),
        rc_url = %config.rc_url,
        "control panel listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            shutdown.await;
            info!("shutdown requested; closing log streams");
            streams.close_streams();
        })
        .await
        .context("HTTP server failed")?;

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
