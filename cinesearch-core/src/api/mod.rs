//! Remote catalog API: endpoint layout, wire shapes, validation,
//! transforms and the typed client built on them.

pub mod client;
pub mod dto;
pub mod endpoints;
pub mod schema;
pub mod transform;

pub use client::{CatalogClient, ClientBuildError, ClientSettings, DEFAULT_TIMEOUT};
pub use endpoints::{CatalogEndpoints, DEFAULT_BASE_URL, EndpointError};
pub use schema::{
    GenresSchema, MovieDetailSchema, MovieSearchSchema, Schema, TokenSchema,
    validate,
};
