//! # Server configuration
//!
//! Settings come from three places, in increasing priority: built-in
//! defaults, an optional TOML file (`--cfg`) and commandline flags or their
//! environment variables (`JIRA_DOMAIN`, `JIRA_EMAIL`, `JIRA_API_TOKEN`).

use crate::jira::{Credentials, JiraClient};
use axum::http::Uri;
use color_eyre::eyre::{bail, eyre, WrapErr};
use color_eyre::{Report, Result};
use serde::{de, Deserialize, Deserializer};
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use structopt::StructOpt;
use tokio::fs::read_to_string;
use tracing::{info, instrument};

/// The landing page that is used when no templates directory is configured
pub const DEFAULT_LANDING_PAGE: &str = include_str!("../../templates/index.html");

/// The commandline flags for the server
#[derive(StructOpt)]
#[structopt(name = "jira-adf-proxy")]
pub struct Flags {
    /// Which config file to use
    #[structopt(long = "cfg", short = "c")]
    pub cfg: Option<PathBuf>,
    /// Which port to use (overrides the port of the configured address)
    #[structopt(long = "port", short = "p")]
    pub port: Option<u16>,
    /// The Jira site, e.g. `https://example.atlassian.net`
    #[structopt(long, env = "JIRA_DOMAIN")]
    pub jira_domain: Option<String>,
    /// The e-mail of the Jira account
    #[structopt(long, env = "JIRA_EMAIL")]
    pub jira_email: Option<String>,
    /// An API token for the Jira account
    #[structopt(long, env = "JIRA_API_TOKEN", hide_env_values = true)]
    pub jira_api_token: Option<String>,
}

/// The Jira site and account we proxy for
#[derive(Debug, Clone)]
pub struct JiraSetup {
    /// The site URL, without a trailing slash
    pub domain: String,
    pub credentials: Credentials,
}

/// The setup that we are actually using
pub struct Setup {
    /// The address to bind to
    pub addr: SocketAddr,
    pub jira: JiraSetup,
    pub attachments: AttachmentConfig,
    pub cors: CorsConfig,
    /// The HTML served at `/`
    pub landing_page: String,
}

impl Setup {
    /// Create the upstream client for this setup
    pub fn client(&self) -> JiraClient {
        JiraClient::new(&self.jira.domain, &self.jira.credentials)
            .restrict_attachments(self.attachments.restrict_to_domain)
            .max_attachment_bytes(self.attachments.max_bytes)
    }
}

impl Flags {
    #[instrument(skip(self))]
    /// Load the configuration from the file and the flags
    pub async fn load_cfg(&self) -> Result<Setup, Report> {
        let config = if let Some(cfg) = &self.cfg {
            let cfg_string: String = read_to_string(cfg)
                .await
                .wrap_err("Could not read config file")?;
            let config: Config =
                toml::from_str(&cfg_string).wrap_err("Could not parse config file")?;
            Some(config)
        } else {
            None
        };

        let landing_page = match config.as_ref().and_then(|c| c.templates.as_ref()) {
            Some(dir) => {
                let path = dir.join("index.html");
                info!("Loading landing page from {}", path.display());
                read_to_string(&path)
                    .await
                    .wrap_err_with(|| format!("Could not read template {}", path.display()))?
            }
            None => DEFAULT_LANDING_PAGE.to_owned(),
        };

        self.resolve(config, landing_page)
    }

    /// Merge the flags with an (optional) config file
    pub fn resolve(&self, config: Option<Config>, landing_page: String) -> Result<Setup> {
        let has_file = config.is_some();
        let config = config.unwrap_or_default();

        let mut addr = config.addr;
        if let Some(port) = self.port {
            if !has_file {
                addr = SocketAddr::from(([0, 0, 0, 0], port));
            } else {
                addr.set_port(port);
            }
        }

        let domain = pick(&self.jira_domain, config.jira.domain, "domain", "JIRA_DOMAIN")?;
        let email = pick(&self.jira_email, config.jira.email, "email", "JIRA_EMAIL")?;
        let api_token = pick(
            &self.jira_api_token,
            config.jira.api_token,
            "api_token",
            "JIRA_API_TOKEN",
        )?;

        Ok(Setup {
            addr,
            jira: JiraSetup {
                domain: validate_domain(&domain)?,
                credentials: Credentials::new(email, api_token),
            },
            attachments: config.attachments,
            cors: config.cors,
            landing_page,
        })
    }
}

fn pick(flag: &Option<String>, file: Option<String>, key: &str, env: &str) -> Result<String> {
    flag.clone()
        .or(file)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            eyre!(
                "Missing Jira {0}: set `jira.{0}` in the config file or the {1} environment variable",
                key,
                env
            )
        })
}

/// Check that the domain is an absolute URL and strip the trailing slash
fn validate_domain(domain: &str) -> Result<String> {
    let domain = domain.trim().trim_end_matches('/');
    let uri: Uri = domain
        .parse()
        .wrap_err_with(|| format!("Invalid Jira domain {:?}", domain))?;
    if uri.scheme().is_none() || uri.authority().is_none() {
        bail!("Jira domain {:?} must include a scheme, e.g. https://", domain);
    }
    Ok(domain.to_owned())
}

/// The Jira options
#[derive(Debug, Default, Deserialize)]
pub struct JiraConfig {
    pub domain: Option<String>,
    pub email: Option<String>,
    pub api_token: Option<String>,
}

/// The attachment proxy options
#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentConfig {
    /// Only download attachments from the Jira site
    #[serde(default = "default_true")]
    pub restrict_to_domain: bool,
    /// Upper bound for the size of a download
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            restrict_to_domain: true,
            max_bytes: default_max_bytes(),
        }
    }
}

/// The CORS options
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// The allowed origins, `"*"` allows any origin
    #[serde(default = "default_origins")]
    pub allow_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: default_origins(),
        }
    }
}

impl CorsConfig {
    pub fn allows_any(&self) -> bool {
        self.allow_origins.iter().any(|origin| origin == "*")
    }
}

/// A configuration for the system
#[derive(Debug, Deserialize)]
pub struct Config {
    /// The address to bind the service to
    #[serde(
        default = "default_addr",
        deserialize_with = "deserialize_from_str"
    )]
    pub addr: SocketAddr,
    /// The directory that contains `index.html`
    #[serde(default)]
    pub templates: Option<PathBuf>,
    #[serde(default)]
    pub jira: JiraConfig,
    #[serde(default)]
    pub attachments: AttachmentConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            templates: None,
            jira: JiraConfig::default(),
            attachments: AttachmentConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8000))
}

fn default_true() -> bool {
    true
}

fn default_max_bytes() -> u64 {
    crate::jira::DEFAULT_MAX_ATTACHMENT_BYTES
}

fn default_origins() -> Vec<String> {
    vec![String::from("*")]
}

// You can use this deserializer for any type that implements FromStr
// and the FromStr::Err implements Display
fn deserialize_from_str<'de, S, D>(deserializer: D) -> Result<S, D::Error>
where
    S: FromStr,      // Required for S::from_str...
    S::Err: Display, // Required for .map_err(de::Error::custom)
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    S::from_str(&s).map_err(de::Error::custom)
}
