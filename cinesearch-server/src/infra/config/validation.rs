use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use super::models::{CatalogConfig, Config, CorsConfig};

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error(
        "token expiry buffer ({buffer}) must be shorter than the token lifetime ({lifetime})"
    )]
    BufferNotShorterThanLifetime { buffer: String, lifetime: String },
    #[error("catalog request timeout must be greater than zero")]
    ZeroRequestTimeout,
    #[error("invalid catalog base URL `{url}`: {reason}")]
    InvalidCatalogUrl { url: String, reason: String },
    #[error("invalid CORS configuration: {reason}")]
    InvalidCorsConfig { reason: String },
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }
}

pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    validate_catalog(&config.catalog, &mut warnings)?;
    validate_cors(&config.cors, &mut warnings)?;

    if config.cache.genre_ttl.is_zero() {
        warnings.push_with_hint(
            "GENRE_CACHE_TTL is zero; every genre request goes upstream",
            "Set GENRE_CACHE_TTL (e.g. `24h`) to serve genres from memory",
        );
    }

    Ok(warnings)
}

fn validate_catalog(
    catalog: &CatalogConfig,
    warnings: &mut ConfigWarnings,
) -> Result<(), ConfigGuardRailError> {
    let url = Url::parse(&catalog.base_url).map_err(|err| {
        ConfigGuardRailError::InvalidCatalogUrl {
            url: catalog.base_url.clone(),
            reason: err.to_string(),
        }
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigGuardRailError::InvalidCatalogUrl {
            url: catalog.base_url.clone(),
            reason: "scheme must be http or https".into(),
        });
    }
    if url.scheme() == "http" {
        warnings.push_with_hint(
            format!("catalog base URL `{}` is not using TLS", catalog.base_url),
            "Bearer tokens are sent in clear text; use https outside local testing",
        );
    }

    if catalog.request_timeout.is_zero() {
        return Err(ConfigGuardRailError::ZeroRequestTimeout);
    }

    if catalog.token_expiry_buffer >= catalog.token_lifetime {
        return Err(ConfigGuardRailError::BufferNotShorterThanLifetime {
            buffer: humantime::format_duration(catalog.token_expiry_buffer)
                .to_string(),
            lifetime: humantime::format_duration(catalog.token_lifetime)
                .to_string(),
        });
    }

    Ok(())
}

fn validate_cors(
    cors: &CorsConfig,
    warnings: &mut ConfigWarnings,
) -> Result<(), ConfigGuardRailError> {
    for origin in &cors.allowed_origins {
        HeaderValue::from_str(origin).map_err(|_| {
            ConfigGuardRailError::InvalidCorsConfig {
                reason: format!(
                    "invalid origin `{origin}` in CORS_ALLOWED_ORIGINS"
                ),
            }
        })?;
    }

    if cors.is_wildcard_included() && cors.allowed_origins.len() > 1 {
        warnings.push(
            "CORS_ALLOWED_ORIGINS mixes `*` with explicit origins; any origin is allowed",
        );
    }

    Ok(())
}
