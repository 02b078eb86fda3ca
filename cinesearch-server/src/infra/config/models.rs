use std::path::PathBuf;
use std::time::Duration;

use cinesearch_core::{ClientSettings, RetryPolicy, TokenPolicy};

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub cache: CacheConfig,
    pub cors: CorsConfig,
    pub metadata: ConfigMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Upstream catalog connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub token_lifetime: Duration,
    pub token_expiry_buffer: Duration,
}

impl CatalogConfig {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            timeout: self.request_timeout,
            token_policy: TokenPolicy {
                lifetime: self.token_lifetime,
                expiry_buffer: self.token_expiry_buffer,
            },
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long a genre listing is served before refetching; zero disables
    /// caching.
    pub genre_ttl: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorsConfig {
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn is_wildcard_included(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

/// Where the configuration came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
