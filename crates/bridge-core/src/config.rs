//! Configuration types for the bridge.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::base_url::BaseUrl;
use crate::error::{BridgeError, Result};

/// Main configuration for the bridge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Backend connection configuration.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Search and collection defaults.
    #[serde(default)]
    pub search: SearchConfig,

    /// MCP server metadata.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Backend connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the vector-store backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Hosts the base URL may point at. Loopback only unless extended.
    #[serde(default = "default_allowed_hosts")]
    pub allowed_hosts: Vec<String>,

    /// Timeout for GET calls in milliseconds.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_ms: u64,

    /// Timeout for POST calls in milliseconds.
    #[serde(default = "default_write_timeout")]
    pub write_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            allowed_hosts: default_allowed_hosts(),
            read_timeout_ms: default_read_timeout(),
            write_timeout_ms: default_write_timeout(),
        }
    }
}

impl BackendConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    /// Parse the base URL and check it against the host allow-list.
    pub fn base_url(&self) -> Result<BaseUrl> {
        BaseUrl::parse(&self.base_url, &self.allowed_hosts)
    }
}

/// Search and collection defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Collection used when a call does not name one.
    #[serde(default = "default_collection")]
    pub default_collection: String,

    /// Default number of results.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Maximum number of results.
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_collection: default_collection(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

/// MCP server metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server name reported to clients.
    #[serde(default = "default_server_name")]
    pub name: String,

    /// Instructions reported to clients.
    #[serde(default = "default_instructions")]
    pub instructions: String,

    /// Bind address of the HTTP transport.
    #[serde(default = "default_http_addr")]
    pub http_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            instructions: default_instructions(),
            http_addr: default_http_addr(),
        }
    }
}

impl ServerConfig {
    pub fn http_addr(&self) -> Result<SocketAddr> {
        self.http_addr.trim().parse().map_err(|_| {
            BridgeError::config(format!(
                "http_addr must be a socket address like 127.0.0.1:8000, got '{}'",
                self.http_addr
            ))
        })
    }
}

// Default value functions

fn default_http_addr() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_base_url() -> String {
    "http://localhost:7070".to_string()
}

fn default_allowed_hosts() -> Vec<String> {
    vec![
        "localhost".to_string(),
        "127.0.0.1".to_string(),
        "::1".to_string(),
    ]
}

fn default_read_timeout() -> u64 {
    10_000
}

fn default_write_timeout() -> u64 {
    30_000
}

fn default_collection() -> String {
    "notes".to_string()
}

fn default_limit() -> u32 {
    5
}

fn default_max_limit() -> u32 {
    50
}

fn default_server_name() -> String {
    "memory-bridge".to_string()
}

fn default_instructions() -> String {
    "Vector-store search and fetch over MCP. Use `search` to find documents, \
     `fetch` to read one by id, `list_collections` to discover collections."
        .to_string()
}

impl BridgeConfig {
    /// Load configuration from file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| BridgeError::config(format!("Failed to parse config: {}", e)))
    }

    /// Load configuration from default paths.
    pub fn load_default() -> Result<Self> {
        // Try user config first
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("memory-bridge").join("config.toml");
            if user_config.exists() {
                return Self::load(&user_config);
            }
        }

        // Try local config
        let local_config = PathBuf::from("memory-bridge.toml");
        if local_config.exists() {
            return Self::load(&local_config);
        }

        Ok(Self::default())
    }

    /// Apply `BASE_URL`, `DEFAULT_COLLECTION`, `DEFAULT_LIMIT` and `MAX_LIMIT`
    /// from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("BASE_URL").filter(|v| !v.trim().is_empty()) {
            self.backend.base_url = url.trim().to_string();
        }
        if let Some(coll) = lookup("DEFAULT_COLLECTION").filter(|v| !v.trim().is_empty()) {
            self.search.default_collection = coll.trim().to_string();
        }
        if let Some(limit) = lookup("DEFAULT_LIMIT") {
            self.search.default_limit = parse_env_u32("DEFAULT_LIMIT", &limit)?;
        }
        if let Some(limit) = lookup("MAX_LIMIT") {
            self.search.max_limit = parse_env_u32("MAX_LIMIT", &limit)?;
        }
        Ok(())
    }

    /// Check the configuration before any request is issued.
    pub fn validate(&self) -> Result<()> {
        self.backend.base_url()?;
        self.server.http_addr()?;

        if self.backend.read_timeout_ms == 0 || self.backend.write_timeout_ms == 0 {
            return Err(BridgeError::config("timeouts must be greater than zero"));
        }
        if self.search.default_collection.trim().is_empty() {
            return Err(BridgeError::config("default_collection must not be empty"));
        }
        if self.search.max_limit == 0 {
            return Err(BridgeError::config("max_limit must be at least 1"));
        }
        if self.search.default_limit == 0 || self.search.default_limit > self.search.max_limit {
            return Err(BridgeError::config(format!(
                "default_limit must be between 1 and max_limit ({})",
                self.search.max_limit
            )));
        }
        Ok(())
    }
}

fn parse_env_u32(key: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| BridgeError::config(format!("{} must be a positive integer, got '{}'", key, value)))
}
