use axum::{
    Json,
    extract::{Path, Query, State},
};
use cinesearch_core::{Movie, MovieId, MovieSearchParams, MovieSearchResponse};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

/// Raw `/api/movies` query. Values stay strings so malformed numbers can be
/// answered with a 400 instead of the extractor's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
    pub genre: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl SearchQuery {
    pub fn into_params(self) -> AppResult<MovieSearchParams> {
        let defaults = MovieSearchParams::default();
        Ok(MovieSearchParams {
            search: non_empty(self.search),
            genre: non_empty(self.genre),
            page: positive("page", self.page, defaults.page)?,
            limit: positive("limit", self.limit, defaults.limit)?,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn positive(name: &str, raw: Option<String>, default: u32) -> AppResult<u32> {
    match non_empty(raw) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u32>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(AppError::bad_request(format!(
                "Invalid {name} parameter: expected a positive integer"
            ))),
        },
    }
}

pub async fn search_movies(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<MovieSearchResponse>> {
    let params = query.into_params()?;
    let page = state.client.search_movies(&params).await?;
    Ok(Json(page))
}

/// Movie plus its display values.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetailView {
    #[serde(flatten)]
    pub movie: Movie,
    pub genre_names: String,
    pub release_year: i32,
    pub rating_display: String,
    pub duration_display: String,
}

impl From<Movie> for MovieDetailView {
    fn from(movie: Movie) -> Self {
        Self {
            genre_names: movie.genre_names(),
            release_year: movie.release_year(),
            rating_display: movie.rating_display(),
            duration_display: movie.duration_display(),
            movie,
        }
    }
}

pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MovieDetailView>> {
    let id = MovieId::new(id);
    if id.is_blank() {
        return Err(missing_id());
    }

    match state.client.get_movie(&id).await {
        Ok(movie) => Ok(Json(movie.into())),
        // Only an upstream 404 status means the movie is missing; transport
        // and decode failures can mention "404" in their text too.
        Err(err) if err.is_not_found() => {
            warn!(id = %id, "movie not found upstream");
            Err(AppError::not_found("Movie not found"))
        }
        Err(err) => Err(err.into()),
    }
}

/// `/api/movies/` with the id segment left empty.
pub async fn movie_id_missing() -> AppError {
    missing_id()
}

fn missing_id() -> AppError {
    AppError::bad_request("Movie ID is required")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, limit: Option<&str>) -> SearchQuery {
        SearchQuery {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
            ..SearchQuery::default()
        }
    }

    #[test]
    fn test_missing_or_empty_values_use_defaults() {
        let params = query(None, Some("")).into_params().unwrap();
        assert_eq!((params.page, params.limit), (1, 25));

        let params = SearchQuery {
            search: Some(String::new()),
            genre: Some(String::new()),
            ..SearchQuery::default()
        }
        .into_params()
        .unwrap();
        assert!(params.search.is_none() && params.genre.is_none());
    }

    #[test]
    fn test_numeric_values_are_parsed() {
        let params = query(Some("3"), Some("10")).into_params().unwrap();
        assert_eq!((params.page, params.limit), (3, 10));
    }

    #[test]
    fn test_malformed_numbers_are_rejected() {
        for (page, limit) in [(Some("abc"), None), (Some("0"), None), (None, Some("-5"))] {
            let err = query(page, limit).into_params().unwrap_err();
            assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_detail_view_flattens_movie() {
        let mut movie = Movie::new("1", "Split");
        movie.duration = Some("PT1H57M".into());
        let value = serde_json::to_value(MovieDetailView::from(movie)).unwrap();

        assert_eq!(value["id"], "1");
        assert_eq!(value["title"], "Split");
        assert_eq!(value["durationDisplay"], "1h 57m");
        assert_eq!(value["genreNames"], "Unknown");
        assert_eq!(value["releaseYear"], 0);
        assert_eq!(value["ratingDisplay"], "N/A");
    }
}
