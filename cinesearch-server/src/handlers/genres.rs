use axum::{Json, extract::State};
use cinesearch_core::Genre;
use serde::Serialize;

use crate::infra::{app_state::AppState, errors::AppResult};

#[derive(Debug, Serialize)]
pub struct GenresBody {
    pub genres: Vec<Genre>,
}

pub async fn list_genres(
    State(state): State<AppState>,
) -> AppResult<Json<GenresBody>> {
    let client = &state.client;
    let genres = state
        .genre_cache
        .get_or_fetch(|| client.list_genres())
        .await?;
    Ok(Json(GenresBody {
        genres: genres.as_ref().clone(),
    }))
}
