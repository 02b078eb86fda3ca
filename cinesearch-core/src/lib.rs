//! # Cinesearch Core
//!
//! Authenticated client for the remote movie catalog.
//!
//! - [`auth`]: bearer token cache with expiry buffer and invalidation
//! - [`http`]: request sending with a one-shot re-authentication on `401`
//! - [`api`]: endpoint layout, response validation, DTO transforms and the
//!   typed [`CatalogClient`]
//!
//! ```no_run
//! use cinesearch_core::{CatalogClient, ClientSettings, MovieSearchParams};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CatalogClient::new(ClientSettings::default())?;
//! let page = client
//!     .search_movies(&MovieSearchParams::new().with_search("batman"))
//!     .await?;
//! for movie in &page.results {
//!     println!("{} ({})", movie.title, movie.rating);
//! }
//! # Ok(())
//! # }
//! ```
#![allow(missing_docs)]

pub mod api;
pub mod auth;
pub mod error;
pub mod http;

pub use api::{CatalogClient, CatalogEndpoints, ClientBuildError, ClientSettings};
pub use auth::{CredentialStore, TokenManager, TokenPolicy};
pub use error::{
    AuthFetchError, CatalogError, Result, SchemaViolation, ValidationError,
};
pub use http::{AuthenticatedFetch, FetchOptions, RetryPolicy};

pub use cinesearch_model::{
    Genre, GenreId, Movie, MovieId, MovieListItem, MovieSearchParams,
    MovieSearchResponse, PaginationInfo,
};
