use crate::display::{
    extract_year, format_duration, format_rating, join_genre_names,
    parse_duration,
};
use crate::ids::{GenreId, MovieId};

/// First page of a search when the caller does not pick one.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Content rating used when the catalog omits one.
pub const NOT_RATED: &str = "NR";
/// Summary used when the catalog omits one.
pub const NO_SUMMARY: &str = "No summary available.";
/// Genre label used when a movie lists no genres.
pub const UNKNOWN_GENRE: &str = "Unknown";
/// Placeholder for display values that cannot be derived.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Genre {
    pub id: GenreId,
    pub title: String,
}

impl Genre {
    pub fn new(id: impl Into<GenreId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// One row of a search result page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MovieListItem {
    pub id: MovieId,
    pub title: String,
    pub poster_url: Option<String>,
    /// Content rating such as `"PG-13"`; never empty.
    pub rating: String,
}

/// Full movie record.
///
/// Only raw catalog values are stored. Display values (`genre_names`,
/// `release_year`, `rating_display`, `duration_display`) are derived on
/// demand so they cannot drift from the fields they describe.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub summary: String,
    pub genres: Vec<Genre>,
    pub poster_url: Option<String>,
    /// Publish date as sent by the catalog, `""` when unknown.
    pub date_published: String,
    pub rating: String,
    /// Audience score on a 0-10 scale, 0 when unknown.
    pub rating_value: f64,
    /// ISO-8601 duration such as `"PT1H43M"`.
    pub duration: Option<String>,
    pub directors: Vec<String>,
    pub main_actors: Vec<String>,
    pub writers: Vec<String>,
}

impl Movie {
    /// A movie carrying only its identity; every other field holds its
    /// documented default.
    pub fn new(id: impl Into<MovieId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            summary: NO_SUMMARY.to_string(),
            genres: Vec::new(),
            poster_url: None,
            date_published: String::new(),
            rating: NOT_RATED.to_string(),
            rating_value: 0.0,
            duration: None,
            directors: Vec::new(),
            main_actors: Vec::new(),
            writers: Vec::new(),
        }
    }

    /// `"Drama, Horror"`, or `"Unknown"` without genres.
    pub fn genre_names(&self) -> String {
        join_genre_names(&self.genres)
    }

    pub fn release_year(&self) -> i32 {
        extract_year(Some(&self.date_published))
    }

    pub fn rating_display(&self) -> String {
        format_rating(Some(self.rating_value))
    }

    pub fn duration_minutes(&self) -> Option<i64> {
        parse_duration(self.duration.as_deref())
    }

    pub fn duration_display(&self) -> String {
        format_duration(self.duration_minutes())
    }
}

/// Query for one page of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovieSearchParams {
    pub search: Option<String>,
    /// Genre filter; the catalog accepts a genre title here.
    pub genre: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl Default for MovieSearchParams {
    fn default() -> Self {
        Self {
            search: None,
            genre: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl MovieSearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

/// One page of search results in server order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MovieSearchResponse {
    pub results: Vec<MovieListItem>,
    pub total_pages: u32,
    /// The page the caller asked for, echoed back unchecked.
    pub current_page: u32,
}

impl MovieSearchResponse {
    pub fn pagination(&self) -> PaginationInfo {
        PaginationInfo {
            current_page: self.current_page,
            total_pages: self.total_pages,
            has_next_page: self.current_page < self.total_pages,
            has_prev_page: self.current_page > 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PaginationInfo {
    pub current_page: u32,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}
