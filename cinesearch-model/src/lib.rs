//! Domain records shared across the cinesearch crates.
#![allow(missing_docs)]

pub mod display;
pub mod ids;
pub mod movie;

// Intentionally curated re-exports for downstream consumers.
pub use display::{
    extract_year, format_duration, format_iso_duration, format_rating,
    join_genre_names, parse_duration,
};
pub use ids::{GenreId, MovieId};
pub use movie::{
    DEFAULT_PAGE, DEFAULT_PAGE_SIZE, Genre, Movie, MovieListItem,
    MovieSearchParams, MovieSearchResponse, NO_SUMMARY, NOT_AVAILABLE,
    NOT_RATED, PaginationInfo, UNKNOWN_GENRE,
};
