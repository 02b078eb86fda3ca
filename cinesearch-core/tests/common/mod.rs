#![allow(dead_code)]

use std::time::Duration;

use chrono::{TimeDelta, Utc};
use cinesearch_core::{
    CatalogClient, CatalogEndpoints, ClientSettings, CredentialStore,
    TokenManager, TokenPolicy,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN_PATH: &str = "/auth/token";

/// `GET /auth/token` answering with `token`.
pub fn token_endpoint(token: &str) -> Mock {
    Mock::given(method("GET"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "token": token })),
        )
}

pub fn token_manager(server: &MockServer) -> TokenManager {
    token_manager_at(&server.uri())
}

pub fn token_manager_at(base_url: &str) -> TokenManager {
    let endpoints =
        CatalogEndpoints::parse(base_url).expect("test base URL is valid");
    TokenManager::new(reqwest::Client::new(), &endpoints, TokenPolicy::default())
}

/// Base URL of a local port nothing listens on.
pub fn closed_port_url() -> std::io::Result<String> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(format!("http://127.0.0.1:{port}"))
}

pub fn settings(base_url: &str) -> ClientSettings {
    ClientSettings {
        timeout: Duration::from_secs(5),
        ..ClientSettings::new(base_url)
    }
}

pub fn client(server: &MockServer) -> CatalogClient {
    CatalogClient::new(settings(&server.uri())).expect("client builds")
}

/// A store holding a token that stays usable for the whole test.
pub fn fresh_store(token: &str) -> CredentialStore {
    CredentialStore::seeded(token, Utc::now() + TimeDelta::hours(1))
}
