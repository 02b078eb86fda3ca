use cinesearch_model::{MovieId, MovieSearchParams};
use thiserror::Error;
use url::Url;

/// Production catalog host.
pub const DEFAULT_BASE_URL: &str =
    "https://0kadddxyh3.execute-api.us-east-1.amazonaws.com";

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("invalid catalog base URL '{url}': {source}")]
    Parse {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("catalog base URL '{0}' cannot carry a path")]
    NotABase(String),
}

/// URL layout of the remote catalog, rooted at a base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEndpoints {
    base: Url,
}

impl Default for CatalogEndpoints {
    fn default() -> Self {
        Self::parse(DEFAULT_BASE_URL)
            .expect("default catalog base URL is valid")
    }
}

impl CatalogEndpoints {
    /// Accepts a base with or without a trailing slash; a path prefix such as
    /// `https://host/stage` is kept.
    pub fn parse(base_url: &str) -> Result<Self, EndpointError> {
        let trimmed = base_url.trim();
        let base = Url::parse(trimmed).map_err(|source| EndpointError::Parse {
            url: trimmed.to_string(),
            source,
        })?;
        if base.cannot_be_a_base() {
            return Err(EndpointError::NotABase(trimmed.to_string()));
        }
        Ok(Self { base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `GET /auth/token`
    pub fn auth_token(&self) -> Url {
        self.with_segments(&["auth", "token"])
    }

    /// `GET /movies?search=&genre=&page=&limit=`
    ///
    /// `search` and `genre` are only sent when present and non-empty; `page`
    /// and `limit` are always sent.
    pub fn movies(&self, params: &MovieSearchParams) -> Url {
        let mut url = self.with_segments(&["movies"]);
        {
            let mut query = url.query_pairs_mut();
            if let Some(search) = non_empty(params.search.as_deref()) {
                query.append_pair("search", search);
            }
            if let Some(genre) = non_empty(params.genre.as_deref()) {
                query.append_pair("genre", genre);
            }
            query.append_pair("page", &params.page.to_string());
            query.append_pair("limit", &params.limit.to_string());
        }
        url
    }

    /// `GET /movies/{id}`
    pub fn movie_detail(&self, id: &MovieId) -> Url {
        self.with_segments(&["movies", id.as_str()])
    }

    /// `GET /genres/movies`
    pub fn genres(&self) -> Url {
        self.with_segments(&["genres", "movies"])
    }

    fn with_segments(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // Bases are checked in `parse`, so this cannot fail.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> CatalogEndpoints {
        CatalogEndpoints::parse("https://catalog.example").unwrap()
    }

    #[test]
    fn default_params_only_send_paging() {
        let url = endpoints().movies(&MovieSearchParams::default());
        assert_eq!(url.as_str(), "https://catalog.example/movies?page=1&limit=25");
    }

    #[test]
    fn search_term_is_encoded() {
        let params = MovieSearchParams::new().with_search("batman");
        let url = endpoints().movies(&params);
        assert_eq!(url.query(), Some("search=batman&page=1&limit=25"));

        let params = MovieSearchParams::new().with_search("the dark knight");
        let url = endpoints().movies(&params);
        assert_eq!(url.query(), Some("search=the+dark+knight&page=1&limit=25"));
    }

    #[test]
    fn empty_filters_never_appear() {
        let params = MovieSearchParams {
            search: Some(String::new()),
            genre: Some(String::new()),
            page: 3,
            limit: 10,
        };
        let url = endpoints().movies(&params);
        let query = url.query().unwrap();
        assert!(!query.contains("search="));
        assert!(!query.contains("genre="));
        assert_eq!(query, "page=3&limit=10");
    }

    #[test]
    fn genre_filter_and_paging_are_sent() {
        let params = MovieSearchParams::new()
            .with_genre("Action")
            .with_page(2)
            .with_limit(50);
        let url = endpoints().movies(&params);
        assert_eq!(url.query(), Some("genre=Action&page=2&limit=50"));
    }

    #[test]
    fn detail_id_is_a_single_path_segment() {
        let url = endpoints().movie_detail(&MovieId::new("a/b c"));
        assert_eq!(url.as_str(), "https://catalog.example/movies/a%2Fb%20c");
    }

    #[test]
    fn base_prefix_is_preserved() {
        let endpoints = CatalogEndpoints::parse("https://catalog.example/stage/").unwrap();
        assert_eq!(endpoints.auth_token().as_str(), "https://catalog.example/stage/auth/token");
        assert_eq!(endpoints.genres().as_str(), "https://catalog.example/stage/genres/movies");
    }

    #[test]
    fn rejects_unusable_bases() {
        assert!(matches!(
            CatalogEndpoints::parse("not a url"),
            Err(EndpointError::Parse { .. })
        ));
        assert!(matches!(
            CatalogEndpoints::parse("mailto:someone@example.com"),
            Err(EndpointError::NotABase(_))
        ));
    }
}
