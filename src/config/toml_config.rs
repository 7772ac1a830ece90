use crate::domain::ports::ConfigProvider;
use crate::utils::error::{BbrError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_REGISTRY_BASE_URL: &str = "https://dawa.aws.dk";
pub const DEFAULT_OWNERSHIP_BASE_URL: &str = "https://boligejer.dk/ejendomsdata/0/10/0";
pub const MAX_CONCURRENCY: usize = 16;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub registry: RegistryConfig,
    pub ownership: OwnershipConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub base_url: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REGISTRY_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnershipConfig {
    pub base_url: String,
}

impl Default for OwnershipConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OWNERSHIP_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    /// The registry host has historically served a certificate chain that
    /// fails verification. Turning this off is safer when the chain is valid.
    pub accept_invalid_certs: bool,
    pub concurrency: usize,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            accept_invalid_certs: true,
            concurrency: 3,
            user_agent: concat!("bbr-export/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl AppConfig {
    /// Reads and parses a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Loads the file when one is given, otherwise the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("registry.base_url", &self.registry.base_url)?;
        validate_url("ownership.base_url", &self.ownership.base_url)?;
        validate_range("http.timeout_seconds", self.http.timeout_seconds, 1, 600)?;
        validate_range("http.concurrency", self.http.concurrency, 1, MAX_CONCURRENCY)?;
        validate_non_empty_string("http.user_agent", &self.http.user_agent)?;
        if self.registry.base_url.contains('?') {
            return Err(BbrError::Config {
                message: "registry.base_url must not carry a query string".to_string(),
            });
        }
        Ok(())
    }
}

impl ConfigProvider for AppConfig {
    fn registry_base_url(&self) -> &str {
        &self.registry.base_url
    }

    fn ownership_base_url(&self) -> &str {
        &self.ownership.base_url
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    fn accept_invalid_certs(&self) -> bool {
        self.http.accept_invalid_certs
    }

    fn concurrency(&self) -> usize {
        self.http.concurrency
    }

    fn user_agent(&self) -> &str {
        &self.http.user_agent
    }
}
