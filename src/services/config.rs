//! Configuration resolution
//!
//! Values are taken from, in order of precedence: command line flags, environment
//! variables, the TOML config file, and defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{ApiVersion, ConfigError, DEFAULT_REQUEST_TIMEOUT, InventoryConfig, Owner};

pub const TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const URL_ENV: &str = "GITHUB_URL";
pub const ORG_ENV: &str = "GHE_INVENTORY_ORG";
pub const API_VERSION_ENV: &str = "GHE_INVENTORY_API_VERSION";

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub token: Option<String>,
    pub url: Option<String>,
    pub organization: Option<String>,
    pub api_version: Option<u8>,
    pub request_timeout_secs: Option<u64>,
    pub include_viewer: bool,
    /// Explicit config file; a missing file is then an error
    pub config_path: Option<PathBuf>,
}

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    pub token: Option<String>,
    pub url: Option<String>,
    pub organization: Option<String>,
    pub api_version: Option<u8>,
    pub request_timeout_secs: Option<u64>,
}

/// Get the default config file location
///
/// Returns `~/.config/ghe-inventory/config.toml` on Linux
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or_else(|| {
        ConfigError::IoError("Unable to determine config directory".to_string())
    })?;
    Ok(config_dir.join("ghe-inventory").join("config.toml"))
}

pub fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))
}

/// Resolves the configuration from the command line, the process environment and
/// the config file.
pub fn resolve_config(overrides: ConfigOverrides) -> Result<InventoryConfig, ConfigError> {
    let file = match &overrides.config_path {
        Some(path) => load_file_config(path)?,
        None => match default_config_path() {
            Ok(path) if path.exists() => load_file_config(&path)?,
            _ => FileConfig::default(),
        },
    };

    resolve_config_with(overrides, file, |key| std::env::var(key).ok())
}

/// Resolution with an explicit file config and environment lookup
pub fn resolve_config_with<F>(
    overrides: ConfigOverrides,
    file: FileConfig,
    env: F,
) -> Result<InventoryConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    let token = non_empty(overrides.token)
        .or_else(|| non_empty(env(TOKEN_ENV)))
        .or_else(|| non_empty(file.token))
        .ok_or(ConfigError::MissingToken)?;

    let raw_url = non_empty(overrides.url)
        .or_else(|| non_empty(env(URL_ENV)))
        .or_else(|| non_empty(file.url))
        .ok_or(ConfigError::MissingBaseUrl)?;
    let base_url = InventoryConfig::parse_base_url(&raw_url)?;

    // An empty organization means "all organizations"
    let organization = non_empty(overrides.organization)
        .or_else(|| non_empty(env(ORG_ENV)))
        .or_else(|| non_empty(file.organization))
        .map(|org| Owner::new(org.trim().to_string()));

    let api_version = match overrides.api_version {
        Some(version) => Some(version),
        None => match non_empty(env(API_VERSION_ENV)) {
            Some(raw) => Some(parse_api_version(&raw)?),
            None => file.api_version,
        },
    };
    let api_version = match api_version {
        Some(version) => ApiVersion::try_from(version)?,
        None => ApiVersion::default(),
    };

    let request_timeout = match overrides.request_timeout_secs.or(file.request_timeout_secs) {
        Some(0) => {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }
        Some(secs) => Duration::from_secs(secs),
        None => DEFAULT_REQUEST_TIMEOUT,
    };

    Ok(InventoryConfig {
        token,
        base_url,
        organization,
        api_version,
        request_timeout,
        include_viewer: overrides.include_viewer,
    })
}

fn parse_api_version(raw: &str) -> Result<u8, ConfigError> {
    raw.trim()
        .parse::<u8>()
        .map_err(|_| ConfigError::UnknownApiVersion(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_flags_take_precedence() {
        let overrides = ConfigOverrides {
            token: Some("flag-token".to_string()),
            url: Some("https://flag.example.com".to_string()),
            api_version: Some(4),
            ..Default::default()
        };
        let file = FileConfig {
            token: Some("file-token".to_string()),
            api_version: Some(3),
            ..Default::default()
        };
        let env = env_of(&[
            (TOKEN_ENV, "env-token"),
            (URL_ENV, "https://env.example.com"),
        ]);

        let config = resolve_config_with(overrides, file, env).unwrap();
        assert_eq!(config.token, "flag-token");
        assert_eq!(config.base_url.as_str(), "https://flag.example.com/");
        assert_eq!(config.api_version, ApiVersion::V4);
        assert_eq!(config.organization, None);
    }

    #[test]
    fn test_env_then_file_then_defaults() {
        let file = FileConfig {
            url: Some("https://file.example.com".to_string()),
            organization: Some("acme".to_string()),
            request_timeout_secs: Some(5),
            ..Default::default()
        };
        let env = env_of(&[(TOKEN_ENV, "env-token")]);

        let config = resolve_config_with(ConfigOverrides::default(), file, env).unwrap();
        assert_eq!(config.token, "env-token");
        assert_eq!(config.base_url.as_str(), "https://file.example.com/");
        assert_eq!(config.organization, Some(Owner::from("acme")));
        assert_eq!(config.api_version, ApiVersion::V3);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_empty_organization_means_all() {
        let overrides = ConfigOverrides {
            token: Some("t".to_string()),
            url: Some("https://ghe.example.com".to_string()),
            organization: Some(String::new()),
            ..Default::default()
        };
        let config = resolve_config_with(overrides, FileConfig::default(), env_of(&[])).unwrap();
        assert_eq!(config.organization, None);
    }

    #[test]
    fn test_configuration_errors() {
        let missing_token = resolve_config_with(
            ConfigOverrides::default(),
            FileConfig::default(),
            env_of(&[(URL_ENV, "https://ghe.example.com")]),
        );
        assert_eq!(missing_token.unwrap_err(), ConfigError::MissingToken);

        let bad_url = resolve_config_with(
            ConfigOverrides::default(),
            FileConfig::default(),
            env_of(&[(TOKEN_ENV, "t"), (URL_ENV, "ghe.example.com")]),
        );
        assert!(matches!(bad_url, Err(ConfigError::InvalidBaseUrl(_))));

        let bad_version = resolve_config_with(
            ConfigOverrides {
                api_version: Some(2),
                ..Default::default()
            },
            FileConfig::default(),
            env_of(&[(TOKEN_ENV, "t"), (URL_ENV, "https://ghe.example.com")]),
        );
        assert_eq!(
            bad_version.unwrap_err(),
            ConfigError::UnknownApiVersion("2".to_string())
        );
    }

    #[test]
    fn test_load_file_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "url = \"https://ghe.example.com\"\napi_version = 4\norganization = \"acme\"\n",
        )
        .unwrap();

        let file = load_file_config(&path).unwrap();
        assert_eq!(file.url.as_deref(), Some("https://ghe.example.com"));
        assert_eq!(file.api_version, Some(4));
        assert_eq!(file.organization.as_deref(), Some("acme"));

        let missing = load_file_config(&temp_dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(ConfigError::IoError(_))));
    }
}
