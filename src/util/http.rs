use axum::http::{header::InvalidHeaderValue, HeaderValue};
use base64::{engine::general_purpose::STANDARD, Engine};
use displaydoc::Display;
use std::result::Result as StdResult;
use thiserror::Error;

#[derive(Debug, Error, Display)]
pub enum Error {
    /// Invalid Header Value: {0}
    InvalidHeader(#[from] InvalidHeaderValue),
}

pub type Result<T> = StdResult<T, Error>;

/// The value of an `Authorization` header for HTTP basic auth
pub fn basic_auth(user: &str, password: &str) -> String {
    let token = STANDARD.encode(format!("{}:{}", user, password));
    format!("Basic {}", token)
}

/// The last path segment of a URL, without query or fragment
pub fn filename_from_url(url: &str) -> &str {
    let end = url.find(|c| c == '?' || c == '#').unwrap_or(url.len());
    let path = &url[..end];
    path.rsplit('/').next().unwrap_or(path)
}

/// A `Content-Disposition` header that asks the browser to save the response
///
/// Quotes and control characters can't appear in a quoted filename, they
/// are replaced with `_`.
pub fn attachment_disposition(filename: &str) -> Result<HeaderValue> {
    let sanitized: String = filename
        .chars()
        .map(|c| if c == '"' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();
    let value = format!("attachment; filename=\"{}\"", sanitized);
    Ok(HeaderValue::from_str(&value)?)
}
