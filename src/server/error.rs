use crate::jira::UpstreamError;
use crate::util::http;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use displaydoc::Display;
use serde_json::json;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{debug, error, warn};

/// Error when answering an API request
///
/// The display string is sent to the client as `{"detail": "..."}`.
#[derive(Debug, Error, Display)]
pub enum ApiError {
    /// Issue not found or access denied
    IssueNotFound(#[source] UpstreamError),
    /// No permission to download attachment
    AttachmentForbidden(#[source] UpstreamError),
    /// {0}
    Upstream(#[source] UpstreamError),
    /// Background task failed: {0}
    Task(#[from] JoinError),
    /// {0}
    Header(#[from] http::Error),
    /// Not Found
    NotFound,
}

impl ApiError {
    /// Map an error from fetching an issue
    pub fn issue(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Status(_) => Self::IssueNotFound(err),
            other => Self::Upstream(other),
        }
    }

    /// Map an error from downloading an attachment
    pub fn attachment(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Status(_) | UpstreamError::ForeignHost(_) => {
                Self::AttachmentForbidden(err)
            }
            other => Self::Upstream(other),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::IssueNotFound(_) | Self::NotFound => StatusCode::NOT_FOUND,
            Self::AttachmentForbidden(_) => StatusCode::FORBIDDEN,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Task(_) | Self::Header(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::IssueNotFound(cause) | Self::AttachmentForbidden(cause) => {
                warn!("{} ({})", self, cause)
            }
            Self::NotFound => debug!("{}", self),
            _ => error!("{}", self),
        }
        let body = json!({ "detail": self.to_string() });
        (status, Json(body)).into_response()
    }
}
