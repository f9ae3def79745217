//! Server configuration: base URL and default headers.
//!
//! `ServerConfig` is plain data, loaded with figment. `SharedConfig` is the
//! process-wide handle around it: one writer (the authentication flow calls
//! `set_authorization_header` on login and logout) and many readers (every
//! request takes a `snapshot`). Readers never block the writer.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// Header carrying the bearer token.
pub const AUTHORIZATION: &str = "Authorization";

/// Default configuration file, looked up in the working directory.
pub const CONFIG_FILE: &str = "incident-tracker.toml";

/// Prefix of environment variable overrides, e.g. `INCIDENT_BASE_URL`.
pub const ENV_PREFIX: &str = "INCIDENT_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub base_url: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            headers: BTreeMap::new(),
        }
    }
}

impl ServerConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            headers: BTreeMap::new(),
        }
    }

    /// Load configuration with hierarchical merging.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. `incident-tracker.toml` (optional)
    /// 3. `INCIDENT_*` environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let config: ServerConfig = Figment::new()
            .merge(Serialized::defaults(ServerConfig::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific TOML file over the defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: ServerConfig = Figment::new()
            .merge(Serialized::defaults(ServerConfig::default()))
            .merge(Toml::file(path.as_ref()))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason,
        };
        let url = url::Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(invalid("not a hierarchical URL".to_string()));
        }
        Ok(())
    }

    /// Sets `Authorization: Bearer <token>`, or removes it for `None`.
    pub fn set_authorization_header(&mut self, token: Option<&str>) {
        match token {
            Some(token) => {
                self.headers
                    .insert(AUTHORIZATION.to_string(), format!("Bearer {token}"));
            }
            None => {
                self.headers.remove(AUTHORIZATION);
            }
        }
    }
}

/// Cloneable handle to the current `ServerConfig`.
#[derive(Debug, Clone)]
pub struct SharedConfig {
    inner: Arc<ArcSwap<ServerConfig>>,
}

impl SharedConfig {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(config)),
        }
    }

    /// The configuration as of now. Later writes do not affect the snapshot.
    pub fn snapshot(&self) -> Arc<ServerConfig> {
        self.inner.load_full()
    }

    pub fn base_url(&self) -> String {
        self.inner.load().base_url.clone()
    }

    /// Replaces base URL and headers wholesale.
    pub fn configure(&self, base_url: impl Into<String>, headers: BTreeMap<String, String>) {
        let base_url = base_url.into();
        debug!(base_url = %base_url, headers = headers.len(), "server configured");
        self.inner.store(Arc::new(ServerConfig { base_url, headers }));
    }

    pub fn set_authorization_header(&self, token: Option<&str>) {
        self.inner.rcu(|current| {
            let mut next = ServerConfig::clone(current);
            next.set_authorization_header(token);
            next
        });
        debug!(authorized = token.is_some(), "authorization header updated");
    }
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}

impl From<ServerConfig> for SharedConfig {
    fn from(config: ServerConfig) -> Self {
        Self::new(config)
    }
}
