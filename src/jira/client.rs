use super::{Download, RawIssue, Upstream, UpstreamError};
use crate::model::de::from_json_str;
use crate::util::http::basic_auth;
use derive_new::new;
use std::fmt;
use tracing::{debug, instrument};
use ureq::http::{Response, StatusCode};
use ureq::{Agent, Body};

/// Default upper bound for a proxied attachment (64 MiB)
pub const DEFAULT_MAX_ATTACHMENT_BYTES: u64 = 64 * 1024 * 1024;

/// The account used to talk to Jira
#[derive(Clone, new)]
pub struct Credentials {
    /// The e-mail address of the account
    pub email: String,
    /// An API token of the account
    pub api_token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

/// A blocking client for the Jira Cloud REST API
#[derive(Clone)]
pub struct JiraClient {
    agent: Agent,
    /// The site URL without a trailing slash
    base: String,
    authorization: String,
    restrict_attachments: bool,
    max_attachment_bytes: u64,
}

impl fmt::Debug for JiraClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraClient")
            .field("base", &self.base)
            .field("restrict_attachments", &self.restrict_attachments)
            .field("max_attachment_bytes", &self.max_attachment_bytes)
            .finish()
    }
}

impl JiraClient {
    /// Create a client for the site at `base_url` (e.g. `https://example.atlassian.net`)
    pub fn new(base_url: &str, credentials: &Credentials) -> Self {
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            base: base_url.trim_end_matches('/').to_owned(),
            authorization: basic_auth(&credentials.email, &credentials.api_token),
            restrict_attachments: true,
            max_attachment_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
        }
    }

    /// Whether attachment URLs must point at the configured site
    pub fn restrict_attachments(mut self, restrict: bool) -> Self {
        self.restrict_attachments = restrict;
        self
    }

    pub fn max_attachment_bytes(mut self, max: u64) -> Self {
        self.max_attachment_bytes = max;
        self
    }

    /// The REST URL for a single issue
    pub fn issue_url(&self, key: &str) -> String {
        format!("{}/rest/api/3/issue/{}", self.base, urlencoding::encode(key))
    }

    /// Whether the URL belongs to the configured site
    pub fn is_own_url(&self, url: &str) -> bool {
        url.strip_prefix(self.base.as_str())
            .map_or(false, |rest| rest.is_empty() || rest.starts_with('/'))
    }

    fn get(&self, url: &str, accept: &str) -> Result<Response<Body>, UpstreamError> {
        let response = self
            .agent
            .get(url)
            .header("Accept", accept)
            .header("Authorization", self.authorization.as_str())
            .call()
            .map_err(UpstreamError::Transport)?;

        let status = response.status();
        debug!("GET {} -> {}", url, status);
        if status != StatusCode::OK {
            return Err(UpstreamError::Status(status.as_u16()));
        }
        Ok(response)
    }
}

impl Upstream for JiraClient {
    #[instrument(skip(self))]
    fn issue(&self, key: &str) -> Result<RawIssue, UpstreamError> {
        let url = self.issue_url(key);
        let mut response = self.get(&url, "application/json")?;
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(UpstreamError::Transport)?;
        from_json_str::<RawIssue>(&body).map_err(UpstreamError::Decode)
    }

    #[instrument(skip(self))]
    fn attachment(&self, url: &str) -> Result<Download, UpstreamError> {
        if self.restrict_attachments && !self.is_own_url(url) {
            return Err(UpstreamError::ForeignHost(url.to_owned()));
        }

        let mut response = self.get(url, "*/*")?;
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = response
            .body_mut()
            .with_config()
            .limit(self.max_attachment_bytes)
            .read_to_vec()
            .map_err(UpstreamError::Transport)?;
        debug!("Downloaded {} bytes", bytes.len());

        Ok(Download {
            content_type,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Credentials, JiraClient};
    use crate::jira::{Upstream, UpstreamError};

    fn client() -> JiraClient {
        let credentials = Credentials::new("me@example.com".into(), "secret".into());
        JiraClient::new("https://example.atlassian.net/", &credentials)
    }

    #[test]
    fn test_issue_url() {
        assert_eq!(
            client().issue_url("PROJ-1"),
            "https://example.atlassian.net/rest/api/3/issue/PROJ-1"
        );
        assert_eq!(
            client().issue_url("a/b c"),
            "https://example.atlassian.net/rest/api/3/issue/a%2Fb%20c"
        );
    }

    #[test]
    fn test_own_url() {
        let client = client();
        assert!(client.is_own_url("https://example.atlassian.net/rest/api/3/attachment/content/1"));
        assert!(!client.is_own_url("https://example.atlassian.net.evil.com/file"));
        assert!(!client.is_own_url("http://169.254.169.254/latest"));
    }

    #[test]
    fn test_foreign_attachment_rejected() {
        let err = client().attachment("https://other.example.com/x").unwrap_err();
        assert!(matches!(err, UpstreamError::ForeignHost(_)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let credentials = Credentials::new("me@example.com".into(), "secret".into());
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("secret"));
        assert!(!format!("{:?}", client()).contains("secret"));
    }
}
