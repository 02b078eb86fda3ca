use axum::{Router, routing::get};

use crate::handlers::{genres, health, movies};
use crate::infra::app_state::AppState;

pub const MOVIES: &str = "/api/movies";
pub const MOVIE_ITEM: &str = "/api/movies/{id}";
pub const GENRES: &str = "/api/genres";
pub const HEALTH: &str = "/health";

pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route(MOVIES, get(movies::search_movies))
        .route("/api/movies/", get(movies::movie_id_missing))
        .route(MOVIE_ITEM, get(movies::get_movie))
        .route(GENRES, get(genres::list_genres))
        .route(HEALTH, get(health::health))
}
