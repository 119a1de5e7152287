//! # The HTTP surface
//!
//! An axum router with the landing page, the issue endpoint and the
//! attachment proxy. Upstream calls are blocking and run on the blocking
//! thread pool.
mod error;

pub use error::ApiError;

use crate::config::{CorsConfig, Setup};
use crate::issue::IssueView;
use crate::jira::Upstream;
use crate::util::http::{attachment_disposition, filename_from_url};
use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::HeaderValue;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use derive_new::new;
use serde::Deserialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

/// Content type of attachments when upstream doesn't name one
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Shared state of all handlers
#[derive(Clone, new)]
pub struct AppState {
    upstream: Arc<dyn Upstream>,
    landing_page: Arc<str>,
}

/// Query of `GET /api/attachment`
#[derive(Debug, Deserialize)]
pub struct AttachmentQuery {
    /// The upstream URL of the attachment
    pub url: String,
    /// The name to save the file as
    #[serde(default)]
    pub filename: Option<String>,
}

async fn home(State(state): State<AppState>) -> Html<String> {
    Html(state.landing_page.to_string())
}

async fn get_issue(
    State(state): State<AppState>,
    Path(issue_key): Path<String>,
) -> Result<Json<IssueView>, ApiError> {
    debug!("Fetching issue {}", issue_key);
    let upstream = state.upstream.clone();
    let raw = task::spawn_blocking(move || upstream.issue(&issue_key))
        .await?
        .map_err(ApiError::issue)?;
    Ok(Json(IssueView::from(raw)))
}

async fn download_attachment(
    State(state): State<AppState>,
    Query(query): Query<AttachmentQuery>,
) -> Result<Response, ApiError> {
    debug!("Downloading attachment {:?}", query);
    let upstream = state.upstream.clone();
    let url = query.url.clone();
    let download = task::spawn_blocking(move || upstream.attachment(&url))
        .await?
        .map_err(ApiError::attachment)?;

    let filename = match query.filename.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => filename_from_url(&query.url),
    };
    let content_type = download
        .content_type
        .as_deref()
        .and_then(|value| HeaderValue::from_str(value).ok())
        .unwrap_or_else(|| HeaderValue::from_static(OCTET_STREAM));
    let disposition = attachment_disposition(filename)?;

    Ok((
        [(CONTENT_TYPE, content_type), (CONTENT_DISPOSITION, disposition)],
        download.bytes,
    )
        .into_response())
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Build the CORS layer for the configured origins
///
/// `"*"` mirrors the request origin, so that credentials stay allowed.
pub fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    if cors.allows_any() {
        return CorsLayer::very_permissive();
    }

    let origins: Vec<HeaderValue> = cors
        .allow_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// Build the axum router
pub fn build_router(state: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/api/issue/{issue_key}", get(get_issue))
        .route("/api/attachment", get(download_attachment))
        .fallback(not_found)
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down"),
        Err(e) => {
            error!("Could not listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await
        }
    }
}

/// Run the server until Ctrl-C is pressed
pub async fn run(setup: Setup) -> Result<(), Report> {
    let client = setup.client();
    let state = AppState::new(Arc::new(client), Arc::from(setup.landing_page));
    let router = build_router(state, &setup.cors);

    let listener = TcpListener::bind(setup.addr)
        .await
        .wrap_err("Can't listen")?;
    info!("Listening on: {}", setup.addr);
    info!("Proxying for {}", setup.jira.domain);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("Server failed")?;
    Ok(())
}
