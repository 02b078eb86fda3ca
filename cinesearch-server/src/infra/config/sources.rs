use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Raw configuration as written in a TOML file. Durations are humantime
/// strings such as `"30s"` or `"55m"`.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub catalog: FileCatalogConfig,
    #[serde(default)]
    pub cache: FileCacheConfig,
    #[serde(default)]
    pub cors: FileCorsConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileCatalogConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_lifetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_expiry_buffer: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileCacheConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_ttl: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileCorsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
}

/// Environment-derived configuration values. Durations stay raw here and
/// are parsed together with the file values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<String>,
    pub catalog_base_url: Option<String>,
    pub catalog_request_timeout: Option<String>,
    pub catalog_token_lifetime: Option<String>,
    pub catalog_token_expiry_buffer: Option<String>,
    pub genre_cache_ttl: Option<String>,
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            config_path: var("CINESEARCH_CONFIG").map(PathBuf::from),
            server_host: var("SERVER_HOST"),
            server_port: var("SERVER_PORT"),
            catalog_base_url: var("CATALOG_BASE_URL"),
            catalog_request_timeout: var("CATALOG_REQUEST_TIMEOUT"),
            catalog_token_lifetime: var("CATALOG_TOKEN_LIFETIME"),
            catalog_token_expiry_buffer: var("CATALOG_TOKEN_EXPIRY_BUFFER"),
            genre_cache_ttl: var("GENRE_CACHE_TTL"),
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS")
                .map(|raw| parse_csv(&raw)),
        }
    }
}

fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|part| {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_from_lookup_reads_known_variables() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SERVER_PORT", "8080"),
            ("CATALOG_BASE_URL", "http://localhost:9000"),
            ("GENRE_CACHE_TTL", "1h"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, ,http://b.test"),
            ("SERVER_HOST", "   "),
        ]);
        let env = EnvConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(env.server_port.as_deref(), Some("8080"));
        assert_eq!(env.catalog_base_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(env.genre_cache_ttl.as_deref(), Some("1h"));
        assert_eq!(
            env.cors_allowed_origins,
            Some(vec!["http://a.test".to_string(), "http://b.test".to_string()])
        );
        assert!(env.server_host.is_none());
        assert!(env.config_path.is_none());
    }

    #[test]
    fn test_file_config_rejects_unknown_keys() {
        let parsed = toml::from_str::<FileConfig>("[catalog]\nbase = \"x\"\n");
        assert!(parsed.is_err());

        let parsed: FileConfig =
            toml::from_str("[catalog]\nbase_url = \"http://x\"\ntoken_lifetime = \"30m\"\n")
                .unwrap();
        assert_eq!(parsed.catalog.token_lifetime.as_deref(), Some("30m"));
    }
}
