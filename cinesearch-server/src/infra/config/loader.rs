use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use cinesearch_core::api::DEFAULT_BASE_URL;
use cinesearch_core::api::DEFAULT_TIMEOUT;
use cinesearch_core::auth::{DEFAULT_EXPIRY_BUFFER, DEFAULT_TOKEN_LIFETIME};
use once_cell::sync::Lazy;
use thiserror::Error;

use super::{
    models::{
        CacheConfig, CatalogConfig, Config, ConfigMetadata, CorsConfig,
        ServerConfig,
    },
    sources::{EnvConfig, FileConfig},
    validation::{self, ConfigGuardRailError, ConfigWarnings},
};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_GENRE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("cinesearch.toml"),
        PathBuf::from("config/cinesearch.toml"),
    ]
});

#[derive(Debug, Default, Clone)]
struct ConfigLoaderOptions {
    config_path: Option<PathBuf>,
    env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    /// Loads `.env`, reads the process environment and resolves the
    /// configuration.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let mut load = self.load_with_env(EnvConfig::gather())?;
        load.config.metadata.env_file_loaded = env_file_loaded;
        Ok(load)
    }

    /// Resolves the configuration against `env` instead of the process
    /// environment. No `.env` file is read.
    pub fn load_with_env(
        &self,
        env: EnvConfig,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        let (config, warnings) =
            self.compose_config(file_config, env, config_path)?;
        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let explicit = self
            .options
            .config_path
            .clone()
            .or_else(|| env.config_path.clone());

        let path = match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            Some(path) => path,
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .find(|candidate| candidate.exists())
            {
                Some(found) => found.clone(),
                None => return Ok((None, None)),
            },
        };

        let contents =
            fs::read_to_string(&path).map_err(|err| ConfigLoadError::Io {
                path: path.clone(),
                source: err,
            })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
                path: path.clone(),
                source: err,
            })?;

        Ok((Some(file_config), Some(path)))
    }

    fn compose_config(
        &self,
        file_config: Option<FileConfig>,
        env: EnvConfig,
        config_path: Option<PathBuf>,
    ) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
        let mut warnings = ConfigWarnings::default();

        if config_path.is_none() {
            warnings.push_with_hint(
                "No cinesearch.toml detected; using environment variables and defaults",
                "Pass --config or set CINESEARCH_CONFIG to load a configuration file",
            );
        }

        let FileConfig {
            server: file_server,
            catalog: file_catalog,
            cache: file_cache,
            cors: file_cors,
        } = file_config.unwrap_or_default();

        let port = match env.server_port {
            Some(raw) => raw.trim().parse().map_err(|_| {
                ConfigLoadError::InvalidValue {
                    key: "SERVER_PORT",
                    value: raw.clone(),
                    reason: "expected a port number".into(),
                }
            })?,
            None => file_server.port.unwrap_or(DEFAULT_PORT),
        };
        let server = ServerConfig {
            host: env
                .server_host
                .or(file_server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        };

        let catalog = CatalogConfig {
            base_url: env
                .catalog_base_url
                .or(file_catalog.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_timeout: resolve_duration(
                "catalog.request_timeout",
                env.catalog_request_timeout,
                file_catalog.request_timeout,
                DEFAULT_TIMEOUT,
            )?,
            token_lifetime: resolve_duration(
                "catalog.token_lifetime",
                env.catalog_token_lifetime,
                file_catalog.token_lifetime,
                DEFAULT_TOKEN_LIFETIME,
            )?,
            token_expiry_buffer: resolve_duration(
                "catalog.token_expiry_buffer",
                env.catalog_token_expiry_buffer,
                file_catalog.token_expiry_buffer,
                DEFAULT_EXPIRY_BUFFER,
            )?,
        };

        let cache = CacheConfig {
            genre_ttl: resolve_duration(
                "cache.genre_ttl",
                env.genre_cache_ttl,
                file_cache.genre_ttl,
                DEFAULT_GENRE_TTL,
            )?,
        };

        let cors = CorsConfig {
            allowed_origins: env
                .cors_allowed_origins
                .or(file_cors.allowed_origins)
                .unwrap_or_default(),
        };

        let config = Config {
            server,
            catalog,
            cache,
            cors,
            metadata: ConfigMetadata {
                config_path,
                env_file_loaded: false,
            },
        };

        let guard_warnings = validation::apply_guard_rails(&config)?;
        warnings.extend(guard_warnings);

        Ok((config, warnings))
    }
}

/// Environment first, then the file, then `default`.
fn resolve_duration(
    key: &'static str,
    env: Option<String>,
    file: Option<String>,
    default: Duration,
) -> Result<Duration, ConfigLoadError> {
    match env.or(file) {
        Some(raw) => humantime::parse_duration(raw.trim()).map_err(|err| {
            ConfigLoadError::InvalidValue {
                key,
                value: raw.clone(),
                reason: err.to_string(),
            }
        }),
        None => Ok(default),
    }
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value `{value}` for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

impl ConfigLoadError {
    /// The configuration file involved, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::MissingConfig { path }
            | Self::Io { path, .. }
            | Self::Parse { path, .. } => Some(path),
            _ => None,
        }
    }
}
