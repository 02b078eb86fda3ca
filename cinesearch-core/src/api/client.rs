use std::sync::Arc;
use std::time::Duration;

use cinesearch_model::{Genre, Movie, MovieId, MovieSearchParams, MovieSearchResponse};
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use super::endpoints::{CatalogEndpoints, EndpointError};
use super::schema::{GenresSchema, MovieDetailSchema, MovieSearchSchema, Schema, validate};
use super::transform::{
    transform_genre_list_item, transform_movie_detail,
    transform_movie_search_response,
};
use crate::auth::{CredentialStore, TokenManager, TokenPolicy};
use crate::error::{CatalogError, Result};
use crate::http::{AuthenticatedFetch, FetchOptions, RetryPolicy};

/// Default request timeout for catalog calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything needed to talk to one catalog deployment.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub token_policy: TokenPolicy,
    pub retry: RetryPolicy,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: super::endpoints::DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            token_policy: TokenPolicy::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Typed operations against the remote catalog.
///
/// Each call fetches with authentication, checks the status, validates the
/// body and converts it to domain types.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    endpoints: CatalogEndpoints,
    fetch: AuthenticatedFetch,
}

impl CatalogClient {
    pub fn new(settings: ClientSettings) -> std::result::Result<Self, ClientBuildError> {
        Self::with_store(settings, CredentialStore::empty())
    }

    /// Like [`Self::new`], starting from an existing credential store.
    pub fn with_store(
        settings: ClientSettings,
        store: CredentialStore,
    ) -> std::result::Result<Self, ClientBuildError> {
        let endpoints = CatalogEndpoints::parse(&settings.base_url)?;
        let http = Client::builder().timeout(settings.timeout).build()?;
        let tokens = TokenManager::new(http.clone(), &endpoints, settings.token_policy)
            .with_store(store);

        debug!(base_url = %endpoints.base_url(), "catalog client ready");

        Ok(Self {
            endpoints,
            fetch: AuthenticatedFetch::new(http, Arc::new(tokens), settings.retry),
        })
    }

    pub fn tokens(&self) -> &Arc<TokenManager> {
        self.fetch.tokens()
    }

    /// One page of movies. `current_page` of the result echoes `params.page`.
    #[instrument(skip(self, params), fields(page = params.page, limit = params.limit), err)]
    pub async fn search_movies(
        &self,
        params: &MovieSearchParams,
    ) -> Result<MovieSearchResponse> {
        let url = self.endpoints.movies(params);
        let record = self.get_validated::<MovieSearchSchema>(url, "movies").await?;
        Ok(transform_movie_search_response(record, params.page))
    }

    #[instrument(skip(self, id), fields(id = %id), err)]
    pub async fn get_movie(&self, id: &MovieId) -> Result<Movie> {
        let url = self.endpoints.movie_detail(id);
        let record = self.get_validated::<MovieDetailSchema>(url, "movie").await?;
        Ok(transform_movie_detail(record))
    }

    /// All genres, in catalog order.
    #[instrument(skip(self), err)]
    pub async fn list_genres(&self) -> Result<Vec<Genre>> {
        let url = self.endpoints.genres();
        let response = self.get_validated::<GenresSchema>(url, "genres").await?;
        Ok(response
            .data
            .into_iter()
            .map(transform_genre_list_item)
            .collect())
    }

    async fn get_validated<S: Schema>(
        &self,
        url: Url,
        what: &str,
    ) -> Result<S::Validated> {
        let response = self.fetch.fetch(url, FetchOptions::default()).await?;
        let body = read_json(response, what).await?;
        validate::<S>(&body).map_err(|err| {
            warn!(context = %err.context, violations = err.violations.len(), "catalog payload rejected");
            CatalogError::from(err)
        })
    }
}

async fn read_json(response: Response, what: &str) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::api(what, status));
    }
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
