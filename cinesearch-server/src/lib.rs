//! # Cinesearch Server
//!
//! JSON proxy in front of the remote movie catalog. Browsers call
//! `/api/movies`, `/api/movies/{id}` and `/api/genres`; the server holds the
//! catalog credential and forwards through [`cinesearch_core::CatalogClient`].

pub mod handlers;
pub mod infra;
pub mod routes;

use axum::{Router, http::HeaderValue};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub use infra::app_state::AppState;

/// Router with tracing and CORS applied, ready to serve.
pub fn create_app(state: AppState) -> Router {
    let cors_layer = build_cors_layer(&state.config().cors.allowed_origins);

    routes::create_api_router()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer),
        )
        .with_state(state)
}

fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let wildcard = allowed_origins.is_empty()
        || allowed_origins.iter().any(|origin| origin == "*");
    let allow_origin = if wildcard {
        AllowOrigin::any()
    } else {
        // Origins are validated during config load.
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([axum::http::Method::GET])
        .allow_headers(Any)
}
