//! Resolved run configuration
//!
//! The CLI, the environment and an optional TOML file are merged into one
//! [`InventoryConfig`] by `services::config`; everything past that point only sees
//! validated values.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

use super::Owner;

/// Default request timeout for API calls
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const REST_API_PATH: &str = "/api/v3";
const API_ROOT_PATH: &str = "/api";

/// GitHub API surface used for the listing
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum ApiVersion {
    /// Page-indexed REST API
    #[default]
    V3,
    /// Cursor-indexed GraphQL API
    V4,
}

impl TryFrom<u8> for ApiVersion {
    type Error = ConfigError;

    fn try_from(version: u8) -> Result<Self, Self::Error> {
        match version {
            3 => Ok(Self::V3),
            4 => Ok(Self::V4),
            other => Err(ConfigError::UnknownApiVersion(other.to_string())),
        }
    }
}

/// Configuration errors. All of them end the run before any request is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingToken,
    MissingBaseUrl,
    InvalidBaseUrl(String),
    UnknownApiVersion(String),
    InvalidValue { key: String, value: String },
    IoError(String),
    ParseError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingToken => write!(
                f,
                "GitHub token is required (--token or GITHUB_TOKEN, scopes read:org and repo)"
            ),
            Self::MissingBaseUrl => write!(
                f,
                "GitHub Enterprise url is required (--url or GITHUB_URL)"
            ),
            Self::InvalidBaseUrl(msg) => write!(f, "Invalid GitHub Enterprise url: {}", msg),
            Self::UnknownApiVersion(version) => write!(f, "unknown api version: {}", version),
            Self::InvalidValue { key, value } => write!(f, "Invalid value for {}: {}", key, value),
            Self::IoError(msg) => write!(f, "IO error: {}", msg),
            Self::ParseError(msg) => write!(f, "Config parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Fully resolved configuration handed to the inventory service
#[derive(Clone)]
pub struct InventoryConfig {
    pub token: String,
    /// Enterprise service root, without the API path
    pub base_url: Url,
    pub organization: Option<Owner>,
    pub api_version: ApiVersion,
    pub request_timeout: Duration,
    /// Also list the viewer's own repositories on the GraphQL surface
    pub include_viewer: bool,
}

impl InventoryConfig {
    /// Parse and validate the enterprise base URL
    pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
        let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidBaseUrl(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ConfigError::InvalidBaseUrl(format!(
                    "unsupported scheme '{}'",
                    scheme
                )));
            }
        }
        if url.host_str().is_none() {
            return Err(ConfigError::InvalidBaseUrl(format!("no host in '{}'", raw)));
        }
        Ok(url)
    }

    /// REST root, e.g. `https://ghe.example.com/api/v3`
    pub fn rest_url(&self) -> Url {
        with_path(&self.base_url, REST_API_PATH)
    }

    /// API root, e.g. `https://ghe.example.com/api`. GraphQL is served at `<root>/graphql`.
    pub fn api_url(&self) -> Url {
        with_path(&self.base_url, API_ROOT_PATH)
    }
}

impl std::fmt::Debug for InventoryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryConfig")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("organization", &self.organization)
            .field("api_version", &self.api_version)
            .field("request_timeout", &self.request_timeout)
            .field("include_viewer", &self.include_viewer)
            .finish()
    }
}

fn with_path(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    url.set_path(path);
    url.set_query(None);
    url.set_fragment(None);
    url
}
