//! Application configuration
//!
//! Settings are merged from three layers, lowest precedence first:
//!
//! 1. a YAML file at `$ASSETQ_CONFIG` or `<config dir>/assetq/config.yaml`
//! 2. `ASSETQ_*` environment variables
//! 3. command-line flags (applied by the CLI runner)
//!
//! A missing file is not an error; every field has a default.

use crate::api::{PlatformClient, DEFAULT_BASE_URL};
use crate::auth::{AuthConfig, Authenticator};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "ASSETQ_CONFIG";
/// Environment variable overriding `base_url`
pub const BASE_URL_ENV: &str = "ASSETQ_BASE_URL";
/// Environment variable overriding `token`
pub const TOKEN_ENV: &str = "ASSETQ_TOKEN";
/// Environment variable overriding `organization_id`
pub const ORGANIZATION_ENV: &str = "ASSETQ_ORGANIZATION_ID";

/// Merged application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// API endpoint
    pub base_url: String,
    /// Personal access token
    pub token: Option<String>,
    /// Organization the requests are billed to
    pub organization_id: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Retries per request on transient failures
    pub max_retries: u32,
    /// Client-side request rate; 0 disables the limiter
    pub requests_per_second: u32,
    /// Page size used when none is given on the command line
    pub default_page_size: Option<u32>,
    /// Page bound used when none is given on the command line
    pub default_max_pages: Option<u32>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            organization_id: None,
            timeout_secs: 30,
            max_retries: 3,
            requests_per_second: 5,
            default_page_size: None,
            default_max_pages: None,
        }
    }
}

impl AppConfig {
    /// Parse settings from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Default config file location: `$ASSETQ_CONFIG`, then the platform
    /// config directory
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("assetq").join("config.yaml"))
    }

    /// Load settings from a file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml(&contents)
            .map_err(|e| Error::config(format!("invalid config file {}: {e}", path.display())))
    }

    /// Load the file layer and apply environment overrides.
    ///
    /// An explicitly named file must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) if !path.exists() => {
                return Err(Error::config(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            Some(path) => Self::load_from(path)?,
            None => match Self::default_path() {
                Some(path) => Self::load_from(&path)?,
                None => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply `ASSETQ_*` overrides read through `lookup`. Empty values are
    /// ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(BASE_URL_ENV) {
            self.base_url = url;
        }
        if let Some(token) = get(TOKEN_ENV) {
            self.token = Some(token);
        }
        if let Some(org) = get(ORGANIZATION_ENV) {
            self.organization_id = Some(org);
        }
    }

    /// HTTP client settings
    pub fn http_client_config(&self) -> HttpClientConfig {
        let builder = HttpClientConfig::builder()
            .base_url(self.base_url.trim_end_matches('/'))
            .timeout(Duration::from_secs(self.timeout_secs.max(1)))
            .max_retries(self.max_retries);

        if self.requests_per_second == 0 {
            builder.no_rate_limit().build()
        } else {
            builder
                .rate_limit(RateLimiterConfig::per_second(self.requests_per_second))
                .build()
        }
    }

    /// Credentials; a token is required
    pub fn auth_config(&self) -> Result<AuthConfig> {
        match self.token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Ok(AuthConfig::bearer(token)),
            _ => Err(Error::missing_field("token")),
        }
    }

    /// Authenticator carrying the credentials and organization
    pub fn authenticator(&self) -> Result<Authenticator> {
        Ok(Authenticator::new(self.auth_config()?).with_organization(self.organization_id.clone()))
    }

    /// Check the base URL is an absolute http(s) URL
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        Ok(())
    }

    /// Build an API client from these settings
    pub fn platform_client(&self) -> Result<PlatformClient> {
        self.validate()?;
        let http = HttpClient::with_auth(self.http_client_config(), self.authenticator()?)?;
        Ok(PlatformClient::new(http))
    }

    /// Copy safe to print: the token is masked
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            token: self.token.as_ref().map(|_| "****".to_string()),
            ..self.clone()
        }
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
