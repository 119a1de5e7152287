//! # The upstream issue tracker
//!
//! This module contains the [`Upstream`] trait that the HTTP handlers talk
//! to, the blocking [`JiraClient`] implementation of it and the subset of the
//! Jira REST v3 issue JSON that the proxy reads.
mod client;
mod raw;

pub use client::{Credentials, JiraClient, DEFAULT_MAX_ATTACHMENT_BYTES};
pub use raw::{
    RawAttachment, RawComment, RawCommentPage, RawFields, RawIssue, RawNamed, RawSubtask,
    RawSubtaskFields, RawUser,
};

use displaydoc::Display;
use thiserror::Error;

/// An attachment fetched from upstream
#[derive(Debug, Clone)]
pub struct Download {
    /// The content type reported by upstream, if any
    pub content_type: Option<String>,
    /// The body of the response
    pub bytes: Vec<u8>,
}

/// Error when talking to the issue tracker
#[derive(Debug, Error, Display)]
pub enum UpstreamError {
    /// Upstream responded with status {0}
    Status(u16),
    /// Request to upstream failed: {0}
    Transport(#[source] ureq::Error),
    /// Could not decode upstream response: {0}
    Decode(#[source] serde_json::Error),
    /// Refusing to send credentials to foreign host {0:?}
    ForeignHost(String),
}

/// Source of issues and attachments
///
/// The calls are blocking; async callers run them on the blocking pool.
pub trait Upstream: Send + Sync {
    /// Fetch a single issue by its key (e.g. `PROJ-123`)
    fn issue(&self, key: &str) -> Result<RawIssue, UpstreamError>;

    /// Download an attachment from an absolute URL
    fn attachment(&self, url: &str) -> Result<Download, UpstreamError>;
}
