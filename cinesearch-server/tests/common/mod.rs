#![allow(dead_code)]

use std::time::Duration;

use anyhow::Result;
use axum_test::TestServer;
use cinesearch_core::CatalogClient;
use cinesearch_server::{
    AppState, create_app,
    infra::config::{
        CacheConfig, CatalogConfig, Config, ConfigMetadata, CorsConfig,
        ServerConfig,
    },
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn test_config(base_url: &str, genre_ttl: Duration) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
        },
        catalog: CatalogConfig {
            base_url: base_url.to_string(),
            request_timeout: Duration::from_secs(5),
            token_lifetime: Duration::from_secs(55 * 60),
            token_expiry_buffer: Duration::from_secs(5 * 60),
        },
        cache: CacheConfig { genre_ttl },
        cors: CorsConfig::default(),
        metadata: ConfigMetadata::default(),
    }
}

/// Proxy wired to `catalog`, with the token endpoint already mounted.
pub async fn proxy_for(catalog: &MockServer) -> Result<TestServer> {
    proxy_with(test_config(&catalog.uri(), Duration::from_secs(3600)), catalog).await
}

pub async fn proxy_with(config: Config, catalog: &MockServer) -> Result<TestServer> {
    Mock::given(method("GET"))
        .and(path("/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "proxy-token" })))
        .mount(catalog)
        .await;

    let client = CatalogClient::new(config.catalog.client_settings())?;
    let app = create_app(AppState::new(client, config));
    TestServer::new(app).map_err(|err| anyhow::anyhow!(err.to_string()))
}
