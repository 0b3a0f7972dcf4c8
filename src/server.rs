//! HTTP surface for the store: the JSON API plus static UI files.

use crate::config::AppConfig;
use crate::document::Document;
use crate::error::Error;
use crate::store::DocumentStore;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const NO_STORE: &str = "no-store, no-cache, must-revalidate";

#[derive(Clone)]
struct AppState {
    store: Arc<DocumentStore>,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "failed to persist document".into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Ack {
            ok: false,
            error: Some(self.message),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        if err.is_client_error() {
            return Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            };
        }
        // Storage detail stays in the log; the client only learns it was us.
        error!(error = %err, "mutation failed");
        Self::internal()
    }
}

#[derive(Debug, Serialize)]
struct Ack {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct AppendResponse {
    ok: bool,
    store: Document,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Open the store described by `config` and build the full router.
pub fn bootstrap(config: &AppConfig) -> Result<Router> {
    info!(
        bind = %config.bind_addr(),
        data_file = %config.data_file().display(),
        static_dir = %config.static_dir().display(),
        "bootstrapping contest server"
    );
    let store = DocumentStore::builder(config.data_file())
        .pretty(config.pretty_json())
        .build()
        .context("failed to open document store")?;
    Ok(build_router(Arc::new(store), config.static_dir()))
}

/// Routes for `/api/*` and `/health`; everything else is served from `static_dir`.
pub fn build_router(store: Arc<DocumentStore>, static_dir: &Path) -> Router {
    let state = AppState { store };

    Router::new()
        .route("/health", get(health))
        .route("/api/data", get(get_data).post(replace_data))
        .route("/api/contestant", post(append_contestant))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn get_data(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let doc = blocking(move || Ok(state.store.load())).await?;
    Ok((
        [(header::CACHE_CONTROL, NO_STORE), (header::PRAGMA, "no-cache")],
        Json(doc),
    ))
}

async fn replace_data(State(state): State<AppState>, body: Bytes) -> Result<Json<Ack>, ApiError> {
    blocking(move || state.store.replace(&body)).await?;
    Ok(Json(Ack {
        ok: true,
        error: None,
    }))
}

async fn append_contestant(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AppendResponse>, ApiError> {
    let store = blocking(move || state.store.append(&body)).await?;
    Ok(Json(AppendResponse { ok: true, store }))
}

/// The guard and the file I/O both block, so keep them off the async workers.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(err) => {
            error!(error = %err, "store task did not complete");
            Err(ApiError::internal())
        }
    }
}

/// Install the `tracing` subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("contest_sync=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "unable to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
