//! Wire shapes of the catalog API.
//!
//! The `*Dto` types are what the structural parse produces: required fields
//! are plain values, everything the catalog may omit is an `Option`. The
//! `*Record` types are the same payloads after defaulting, with no optional
//! field left except the ones that are nullable in the domain too.

use serde::Deserialize;

/// `GET /auth/token`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponseDto {
    pub token: String,
}

/// Genre entry nested in a movie detail.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenreDto {
    pub id: String,
    pub title: String,
}

/// Element of `GET /movies` → `data`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieListItemDto {
    pub id: String,
    pub title: String,
    pub poster_url: Option<String>,
    pub rating: Option<String>,
}

/// `GET /movies`
#[derive(Debug, Clone, PartialEq)]
pub struct MovieSearchResponseDto {
    pub data: Vec<MovieListItemDto>,
    pub total_pages: u32,
}

/// `GET /movies/{id}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetailDto {
    pub id: String,
    pub title: String,
    pub poster_url: Option<String>,
    pub rating: Option<String>,
    pub summary: Option<String>,
    pub duration: Option<String>,
    pub directors: Option<Vec<String>>,
    pub main_actors: Option<Vec<String>>,
    pub date_published: Option<String>,
    pub rating_value: Option<f64>,
    pub best_rating: Option<f64>,
    pub worst_rating: Option<f64>,
    pub writers: Option<Vec<String>>,
    pub genres: Option<Vec<GenreDto>>,
}

/// Movie reference attached to a genre listing. Carried for completeness;
/// nothing downstream reads it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MovieRefDto {
    pub id: String,
}

/// Element of `GET /genres/movies` → `data`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenreListItemDto {
    pub id: String,
    pub title: String,
    pub movies: Option<Vec<MovieRefDto>>,
}

/// `GET /genres/movies`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenresResponseDto {
    pub data: Vec<GenreListItemDto>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieListItemRecord {
    pub id: String,
    pub title: String,
    pub poster_url: Option<String>,
    pub rating: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovieSearchRecord {
    pub data: Vec<MovieListItemRecord>,
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetailRecord {
    pub id: String,
    pub title: String,
    pub poster_url: Option<String>,
    pub rating: String,
    pub summary: String,
    pub duration: Option<String>,
    pub directors: Vec<String>,
    pub main_actors: Vec<String>,
    pub date_published: String,
    pub rating_value: f64,
    pub best_rating: f64,
    pub worst_rating: f64,
    pub writers: Vec<String>,
    pub genres: Vec<GenreDto>,
}
