//! Validated records → domain types.
//!
//! Every function here is total: validation has already guaranteed the
//! shape, so no transform can fail.

use cinesearch_model::{Genre, Movie, MovieListItem, MovieSearchResponse};

pub use cinesearch_model::{
    extract_year, format_duration, format_iso_duration, format_rating,
    join_genre_names, parse_duration,
};

use super::dto::{
    GenreDto, GenreListItemDto, MovieDetailRecord, MovieListItemRecord,
    MovieSearchRecord,
};

pub fn transform_movie_list_item(record: MovieListItemRecord) -> MovieListItem {
    MovieListItem {
        id: record.id.into(),
        title: record.title,
        poster_url: record.poster_url,
        rating: record.rating,
    }
}

pub fn transform_movie_detail(record: MovieDetailRecord) -> Movie {
    Movie {
        id: record.id.into(),
        title: record.title,
        summary: record.summary,
        genres: record.genres.into_iter().map(transform_genre).collect(),
        poster_url: record.poster_url,
        date_published: record.date_published,
        rating: record.rating,
        rating_value: record.rating_value,
        duration: record.duration,
        directors: record.directors,
        main_actors: record.main_actors,
        writers: record.writers,
    }
}

/// `current_page` is the page the caller requested; the catalog does not
/// echo it back.
pub fn transform_movie_search_response(
    record: MovieSearchRecord,
    current_page: u32,
) -> MovieSearchResponse {
    MovieSearchResponse {
        results: record
            .data
            .into_iter()
            .map(transform_movie_list_item)
            .collect(),
        total_pages: record.total_pages,
        current_page,
    }
}

/// Drops the attached movie references.
pub fn transform_genre_list_item(item: GenreListItemDto) -> Genre {
    Genre::new(item.id, item.title)
}

fn transform_genre(genre: GenreDto) -> Genre {
    Genre::new(genre.id, genre.title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::MovieRefDto;

    fn detail_record() -> MovieDetailRecord {
        MovieDetailRecord {
            id: "123".into(),
            title: "Test Movie".into(),
            poster_url: Some("https://img/123.jpg".into()),
            rating: "PG-13".into(),
            summary: "A test.".into(),
            duration: Some("PT1H43M".into()),
            directors: vec!["Director One".into()],
            main_actors: vec!["Actor One".into(), "Actor Two".into()],
            date_published: "2016-03-11".into(),
            rating_value: 7.2,
            best_rating: 10.0,
            worst_rating: 1.0,
            writers: vec!["Writer One".into()],
            genres: vec![
                GenreDto { id: "1".into(), title: "Drama".into() },
                GenreDto { id: "2".into(), title: "Horror".into() },
            ],
        }
    }

    #[test]
    fn test_transform_movie_detail() {
        let movie = transform_movie_detail(detail_record());

        assert_eq!(movie.id.as_str(), "123");
        assert_eq!(movie.genres.len(), 2);
        assert_eq!(movie.genre_names(), "Drama, Horror");
        assert_eq!(movie.release_year(), 2016);
        assert_eq!(movie.rating_display(), "7.2/10");
        assert_eq!(movie.duration_display(), "1h 43m");
        assert_eq!(movie.main_actors, ["Actor One", "Actor Two"]);
    }

    #[test]
    fn test_transform_detail_without_optional_values() {
        let mut record = detail_record();
        record.genres.clear();
        record.duration = None;
        record.rating_value = 0.0;
        record.date_published.clear();

        let movie = transform_movie_detail(record);
        assert_eq!(movie.genre_names(), "Unknown");
        assert_eq!(movie.duration_display(), "N/A");
        assert_eq!(movie.rating_display(), "N/A");
        assert_eq!(movie.release_year(), 0);
    }

    #[test]
    fn test_transform_search_response_keeps_order() {
        let record = MovieSearchRecord {
            data: vec![
                MovieListItemRecord {
                    id: "b".into(),
                    title: "Second alphabetically".into(),
                    poster_url: None,
                    rating: "NR".into(),
                },
                MovieListItemRecord {
                    id: "a".into(),
                    title: "First alphabetically".into(),
                    poster_url: Some("https://img/a.jpg".into()),
                    rating: "R".into(),
                },
            ],
            total_pages: 10,
        };

        let response = transform_movie_search_response(record, 3);
        assert_eq!(response.current_page, 3);
        assert_eq!(response.total_pages, 10);
        let ids: Vec<_> = response.results.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(response.results[0].poster_url, None);
    }

    #[test]
    fn test_transform_genre_list_item() {
        let genre = transform_genre_list_item(GenreListItemDto {
            id: "g1".into(),
            title: "Action".into(),
            movies: Some(vec![MovieRefDto { id: "1".into() }]),
        });
        assert_eq!(genre, Genre::new("g1", "Action"));
    }
}
