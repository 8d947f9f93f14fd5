//! Configuration for the adapter
//!
//! Provides a builder pattern for configuring the adapter, and parsing of
//! the JSON option object (`{"hanaOpts": {...}, "poolOpts": {...}}`).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Database connection settings
///
/// The adapter does not open connections itself; these settings are handed
/// to whichever executor the caller builds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    #[serde(rename = "hostName", alias = "host", default)]
    pub host: String,
    #[serde(default)]
    pub port: u16,
    #[serde(rename = "userName", alias = "uid", default)]
    pub user: String,
    #[serde(alias = "pwd", default)]
    pub password: String,
}

impl ConnectionSettings {
    /// Key identifying executors that may be shared (`host:port:user`)
    pub fn connection_key(&self) -> String {
        format!("{}:{}:{}", self.host, self.port, self.user)
    }
}

fn default_max_connections() -> u32 {
    50
}

fn default_request_timeout() -> u64 {
    30_000
}

/// Pool options passed through to the executor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolOptions {
    /// Maximum number of pooled connections (default: 50)
    #[serde(default = "default_max_connections")]
    pub max: u32,
    /// Upper bound for a single statement, in milliseconds (default: 30000)
    #[serde(rename = "requestTimeout", default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max: default_max_connections(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl PoolOptions {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Configuration for the adapter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
    #[serde(rename = "hanaOpts", default)]
    pub connection: ConnectionSettings,
    #[serde(rename = "poolOpts", default)]
    pub pool: PoolOptions,
    /// Log every statement at info level instead of debug
    #[serde(default)]
    pub debug: bool,
}

impl AdapterConfig {
    /// Create a new configuration builder
    pub fn builder() -> AdapterConfigBuilder {
        AdapterConfigBuilder::default()
    }

    /// Parse the JSON option object
    ///
    /// # Example
    /// ```
    /// use hana_query_builder::AdapterConfig;
    ///
    /// let config = AdapterConfig::from_json(&serde_json::json!({
    ///     "hanaOpts": {"host": "127.0.0.1", "port": 30015, "uid": "root", "pwd": "test"}
    /// }))
    /// .unwrap();
    /// assert_eq!(config.connection.connection_key(), "127.0.0.1:30015:root");
    /// assert_eq!(config.pool.max, 50);
    /// ```
    pub fn from_json(options: &serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(options.clone())?)
    }
}

/// Builder for AdapterConfig
#[derive(Debug, Default)]
pub struct AdapterConfigBuilder {
    config: AdapterConfig,
}

impl AdapterConfigBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.connection.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.connection.port = port;
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.config.connection.user = user.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.connection.password = password.into();
        self
    }

    /// Set the maximum pool size (default: 50)
    pub fn max_connections(mut self, max: u32) -> Self {
        self.config.pool.max = max;
        self
    }

    /// Set the per-statement timeout (default: 30s)
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.pool.request_timeout_ms =
            u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Enable or disable info-level statement logging (default: false)
    pub fn debug(mut self, enabled: bool) -> Self {
        self.config.debug = enabled;
        self
    }

    /// Build the configuration
    pub fn build(self) -> AdapterConfig {
        self.config
    }
}
