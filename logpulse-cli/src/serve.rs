//! Dashboard HTTP server
//!
//! Thin presentation layer over the core aggregator: every request runs an
//! independent aggregation pass, so two simultaneous dashboard requests
//! never share counter state.

use anyhow::Context;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use logpulse_core::html::render_html_report;
use logpulse_core::{aggregate_file, ResolvedConfig, TrafficSummary};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Immutable per-server state shared by the handlers
pub struct ServeState {
    pub source_path: PathBuf,
    pub top_n: usize,
    pub title: String,
}

/// Build the dashboard router
pub fn build_router(state: Arc<ServeState>) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/stats.json", get(stats))
        .with_state(state)
}

/// Start the dashboard server and block until it exits
pub fn run(addr: SocketAddr, config: ResolvedConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let state = Arc::new(ServeState {
        source_path: config.source_path,
        top_n: config.top_n,
        title: config.title,
    });

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(async move {
        let app = build_router(state);

        info!(%addr, "starting dashboard server");
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        axum::serve(listener, app).await.context("server error")
    })
}

/// `GET /` — aggregate the configured log and render the HTML dashboard.
/// A missing log renders the zero-state report, not an error.
async fn dashboard(State(state): State<Arc<ServeState>>) -> Response {
    match aggregate(&state).await {
        Ok(summary) => Html(render_html_report(&summary, &state.title)).into_response(),
        Err(err) => read_failure("/", err),
    }
}

/// `GET /stats.json` — the raw aggregation result
async fn stats(State(state): State<Arc<ServeState>>) -> Response {
    match aggregate(&state).await {
        Ok(summary) => Json(summary).into_response(),
        Err(err) => read_failure("/stats.json", err),
    }
}

/// Run one aggregation pass on the blocking pool
async fn aggregate(state: &Arc<ServeState>) -> anyhow::Result<TrafficSummary> {
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || aggregate_file(&state.source_path, state.top_n))
        .await
        .context("aggregation task panicked")?
}

/// A failed read is a 500, not an empty report: an unreadable log must not
/// look like a quiet one.
fn read_failure(route: &str, err: anyhow::Error) -> Response {
    error!(route, error = %err, "aggregation failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("failed to read log: {:#}", err),
    )
        .into_response()
}
