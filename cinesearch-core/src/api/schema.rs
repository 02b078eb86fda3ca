//! Response validation.
//!
//! Validation runs in two stages. The structural parse ([`Schema::parse`])
//! only insists on what the wire must contain (ids, titles and the response
//! envelopes) and records every violation it meets with a path. Defaulting
//! ([`Schema::apply_defaults`]) then fills whatever the catalog is allowed
//! to omit.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use cinesearch_model::{NO_SUMMARY, NOT_RATED};

use super::dto::{
    GenreListItemDto, GenresResponseDto, MovieDetailDto, MovieDetailRecord,
    MovieListItemDto, MovieListItemRecord, MovieSearchRecord,
    MovieSearchResponseDto, TokenResponseDto,
};
use crate::error::{SchemaViolation, ValidationError};

/// Path of the payload root in violation reports.
pub const ROOT: &str = "$";

const DEFAULT_BEST_RATING: f64 = 10.0;
const DEFAULT_WORST_RATING: f64 = 1.0;

/// A wire record whose string fields in `REQUIRED` must be present.
pub trait WireRecord: DeserializeOwned {
    const REQUIRED: &'static [&'static str];
}

impl WireRecord for TokenResponseDto {
    const REQUIRED: &'static [&'static str] = &["token"];
}

impl WireRecord for MovieListItemDto {
    const REQUIRED: &'static [&'static str] = &["id", "title"];
}

impl WireRecord for MovieDetailDto {
    const REQUIRED: &'static [&'static str] = &["id", "title"];
}

impl WireRecord for GenreListItemDto {
    const REQUIRED: &'static [&'static str] = &["id", "title"];
}

/// Schema of one endpoint's response body.
pub trait Schema {
    /// Shape produced by the structural parse.
    type Wire;
    /// Shape after defaulting.
    type Validated;

    /// Message of the [`ValidationError`] raised for this endpoint.
    const CONTEXT: &'static str;

    fn parse(value: &Value, checker: &mut Checker) -> Option<Self::Wire>;

    fn apply_defaults(wire: Self::Wire) -> Self::Validated;
}

/// Runs both stages of `S` over `value`.
pub fn validate<S: Schema>(
    value: &Value,
) -> Result<S::Validated, ValidationError> {
    parse_structure::<S>(value).map(S::apply_defaults)
}

/// Runs only the structural stage of `S`.
pub fn parse_structure<S: Schema>(
    value: &Value,
) -> Result<S::Wire, ValidationError> {
    let mut checker = Checker::default();
    let wire = S::parse(value, &mut checker);
    checker.finish(S::CONTEXT, wire)
}

/// Collects violations while walking a payload.
#[derive(Debug, Default)]
pub struct Checker {
    violations: Vec<SchemaViolation>,
}

impl Checker {
    pub fn violation(
        &mut self,
        path: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.violations.push(SchemaViolation {
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn object<'v>(
        &mut self,
        value: &'v Value,
        path: &str,
    ) -> Option<&'v Map<String, Value>> {
        let object = value.as_object();
        if object.is_none() {
            self.violation(
                path,
                format!("expected an object, found {}", kind(value)),
            );
        }
        object
    }

    /// `key` of `object`; absent and `null` both count as missing.
    pub fn required<'v>(
        &mut self,
        object: &'v Map<String, Value>,
        parent: &str,
        key: &str,
    ) -> Option<&'v Value> {
        match object.get(key) {
            Some(value) if !value.is_null() => Some(value),
            _ => {
                self.violation(child(parent, key), "required field is missing");
                None
            }
        }
    }

    pub fn record<T: WireRecord>(
        &mut self,
        value: &Value,
        path: &str,
    ) -> Option<T> {
        let object = self.object(value, path)?;

        let mut complete = true;
        for key in T::REQUIRED {
            match self.required(object, path, key) {
                Some(Value::String(_)) => {}
                Some(other) => {
                    self.violation(
                        child(path, key),
                        format!("expected a string, found {}", kind(other)),
                    );
                    complete = false;
                }
                None => complete = false,
            }
        }
        if !complete {
            return None;
        }

        match T::deserialize(value) {
            Ok(record) => Some(record),
            Err(err) => {
                self.violation(path, err.to_string());
                None
            }
        }
    }

    /// Every element of an array, or `None` if any element is invalid.
    /// All invalid elements are reported, not just the first.
    pub fn list<T: WireRecord>(
        &mut self,
        value: &Value,
        path: &str,
    ) -> Option<Vec<T>> {
        let Some(items) = value.as_array() else {
            self.violation(
                path,
                format!("expected an array, found {}", kind(value)),
            );
            return None;
        };

        let before = self.violations.len();
        let records: Vec<T> = items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                self.record(item, &format!("{path}[{index}]"))
            })
            .collect();

        (self.violations.len() == before).then_some(records)
    }

    /// A non-negative whole number that fits a page counter.
    pub fn page_count(
        &mut self,
        object: &Map<String, Value>,
        parent: &str,
        key: &str,
    ) -> Option<u32> {
        let value = self.required(object, parent, key)?;
        let count = value
            .as_u64()
            .or_else(|| {
                value
                    .as_f64()
                    .filter(|n| *n >= 0.0 && n.fract() == 0.0)
                    .map(|n| n as u64)
            })
            .and_then(|n| u32::try_from(n).ok());
        if count.is_none() {
            self.violation(
                child(parent, key),
                format!("expected a page count, found {value}"),
            );
        }
        count
    }

    fn finish<T>(
        self,
        context: &str,
        parsed: Option<T>,
    ) -> Result<T, ValidationError> {
        match parsed {
            Some(value) if self.violations.is_empty() => Ok(value),
            _ => {
                let mut violations = self.violations;
                if violations.is_empty() {
                    violations.push(SchemaViolation {
                        path: ROOT.to_string(),
                        message: "payload did not match".to_string(),
                    });
                }
                Err(ValidationError::new(context, violations))
            }
        }
    }
}

fn child(parent: &str, key: &str) -> String {
    if parent == ROOT {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// `{ token }`
#[derive(Debug, Clone, Copy)]
pub struct TokenSchema;

impl Schema for TokenSchema {
    type Wire = TokenResponseDto;
    type Validated = TokenResponseDto;

    const CONTEXT: &'static str = "Invalid token response";

    fn parse(value: &Value, checker: &mut Checker) -> Option<Self::Wire> {
        checker.record(value, ROOT)
    }

    fn apply_defaults(wire: Self::Wire) -> Self::Validated {
        wire
    }
}

/// `{ data: MovieListItem[], totalPages }`
#[derive(Debug, Clone, Copy)]
pub struct MovieSearchSchema;

impl Schema for MovieSearchSchema {
    type Wire = MovieSearchResponseDto;
    type Validated = MovieSearchRecord;

    const CONTEXT: &'static str = "Invalid movie search response";

    fn parse(value: &Value, checker: &mut Checker) -> Option<Self::Wire> {
        let object = checker.object(value, ROOT)?;
        let data = checker
            .required(object, ROOT, "data")
            .and_then(|items| checker.list(items, "data"));
        let total_pages = checker.page_count(object, ROOT, "totalPages");

        Some(MovieSearchResponseDto {
            data: data?,
            total_pages: total_pages?,
        })
    }

    fn apply_defaults(wire: Self::Wire) -> Self::Validated {
        MovieSearchRecord {
            data: wire.data.into_iter().map(list_item_defaults).collect(),
            total_pages: wire.total_pages,
        }
    }
}

/// Full movie detail.
#[derive(Debug, Clone, Copy)]
pub struct MovieDetailSchema;

impl Schema for MovieDetailSchema {
    type Wire = MovieDetailDto;
    type Validated = MovieDetailRecord;

    const CONTEXT: &'static str = "Invalid movie detail response";

    fn parse(value: &Value, checker: &mut Checker) -> Option<Self::Wire> {
        checker.record(value, ROOT)
    }

    fn apply_defaults(wire: Self::Wire) -> Self::Validated {
        MovieDetailRecord {
            id: wire.id,
            title: wire.title,
            poster_url: wire.poster_url,
            rating: content_rating(wire.rating),
            summary: wire.summary.unwrap_or_else(|| NO_SUMMARY.to_string()),
            duration: wire.duration,
            directors: wire.directors.unwrap_or_default(),
            main_actors: wire.main_actors.unwrap_or_default(),
            date_published: wire.date_published.unwrap_or_default(),
            rating_value: wire.rating_value.unwrap_or(0.0),
            best_rating: wire.best_rating.unwrap_or(DEFAULT_BEST_RATING),
            worst_rating: wire.worst_rating.unwrap_or(DEFAULT_WORST_RATING),
            writers: wire.writers.unwrap_or_default(),
            genres: wire.genres.unwrap_or_default(),
        }
    }
}

/// `{ data: GenreListItem[] }`
#[derive(Debug, Clone, Copy)]
pub struct GenresSchema;

impl Schema for GenresSchema {
    type Wire = GenresResponseDto;
    type Validated = GenresResponseDto;

    const CONTEXT: &'static str = "Invalid genres response";

    fn parse(value: &Value, checker: &mut Checker) -> Option<Self::Wire> {
        let object = checker.object(value, ROOT)?;
        let data = checker
            .required(object, ROOT, "data")
            .and_then(|items| checker.list(items, "data"))?;
        Some(GenresResponseDto { data })
    }

    fn apply_defaults(wire: Self::Wire) -> Self::Validated {
        wire
    }
}

fn list_item_defaults(dto: MovieListItemDto) -> MovieListItemRecord {
    MovieListItemRecord {
        id: dto.id,
        title: dto.title,
        poster_url: dto.poster_url,
        rating: content_rating(dto.rating),
    }
}

// Content ratings are never empty once validated.
fn content_rating(rating: Option<String>) -> String {
    rating
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| NOT_RATED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn token_response_requires_token() {
        let ok = validate::<TokenSchema>(&json!({ "token": "abc" })).unwrap();
        assert_eq!(ok.token, "abc");

        let err = validate::<TokenSchema>(&json!({})).unwrap_err();
        assert_eq!(err.context, "Invalid token response");
        assert!(err.violation_at("token").is_some());
    }

    #[test]
    fn search_response_with_optional_fields_missing() {
        let body = json!({
            "data": [
                { "id": "1", "title": "Movie 1", "posterUrl": "https://img/1.jpg", "rating": "PG" },
                { "id": "2", "title": "Movie 2" },
                { "id": "3", "title": "Movie 3", "posterUrl": null }
            ],
            "totalPages": 10
        });

        let record = validate::<MovieSearchSchema>(&body).unwrap();
        assert_eq!(record.total_pages, 10);
        assert_eq!(record.data.len(), 3);
        assert_eq!(record.data[0].rating, "PG");
        assert_eq!(record.data[1].rating, "NR");
        assert_eq!(record.data[1].poster_url, None);
        assert_eq!(record.data[2].poster_url, None);
    }

    #[test]
    fn empty_results_are_valid() {
        let record =
            validate::<MovieSearchSchema>(&json!({ "data": [], "totalPages": 0 }))
                .unwrap();
        assert!(record.data.is_empty());
    }

    #[test]
    fn search_response_reports_every_bad_element() {
        let body = json!({
            "data": [
                { "id": "1", "title": "ok" },
                { "title": "no id" },
                { "id": "3" },
                { "id": 4, "title": "numeric id" }
            ]
        });

        let err = validate::<MovieSearchSchema>(&body).unwrap_err();
        assert_eq!(err.context, "Invalid movie search response");
        assert!(err.violation_at("data[1].id").is_some());
        assert!(err.violation_at("data[2].title").is_some());
        assert_eq!(
            err.violation_at("data[3].id").map(|v| v.message.as_str()),
            Some("expected a string, found a number")
        );
        assert!(err.violation_at("totalPages").is_some());
        assert_eq!(err.violations.len(), 4);
    }

    #[test]
    fn non_object_root_is_rejected() {
        let err = validate::<MovieSearchSchema>(&json!([1, 2])).unwrap_err();
        assert_eq!(err.violations[0].path, "$");
        assert_eq!(err.violations[0].message, "expected an object, found an array");
    }

    #[test]
    fn detail_with_minimal_fields_is_defaulted() {
        let record =
            validate::<MovieDetailSchema>(&json!({ "id": "1", "title": "Minimal" }))
                .unwrap();

        assert_eq!(record.summary, "No summary available.");
        assert_eq!(record.rating, "NR");
        assert_eq!(record.rating_value, 0.0);
        assert_eq!(record.best_rating, 10.0);
        assert_eq!(record.worst_rating, 1.0);
        assert_eq!(record.date_published, "");
        assert!(record.directors.is_empty());
        assert!(record.main_actors.is_empty());
        assert!(record.writers.is_empty());
        assert!(record.genres.is_empty());
        assert!(record.duration.is_none());
    }

    #[test]
    fn detail_with_all_fields_is_kept() {
        let body = json!({
            "id": "abc",
            "title": "Split",
            "posterUrl": "https://img/split.jpg",
            "rating": "PG-13",
            "summary": "Three girls are kidnapped.",
            "duration": "PT1H57M",
            "directors": ["M. Night Shyamalan"],
            "mainActors": ["James McAvoy", "Anya Taylor-Joy"],
            "datePublished": "2017-01-20",
            "ratingValue": 7.3,
            "bestRating": 10,
            "worstRating": 1,
            "writers": ["M. Night Shyamalan"],
            "genres": [{ "id": "horror", "title": "Horror" }]
        });

        let record = validate::<MovieDetailSchema>(&body).unwrap();
        assert_eq!(record.rating, "PG-13");
        assert_eq!(record.rating_value, 7.3);
        assert_eq!(record.main_actors.len(), 2);
        assert_eq!(record.genres[0].title, "Horror");
    }

    #[test]
    fn detail_with_wrong_optional_type_is_rejected() {
        let err = validate::<MovieDetailSchema>(
            &json!({ "id": "1", "title": "x", "ratingValue": "high" }),
        )
        .unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].path, "$");
        assert!(err.violations[0].message.contains("invalid type"));
    }

    #[test]
    fn blank_rating_counts_as_absent() {
        let record = validate::<MovieDetailSchema>(
            &json!({ "id": "1", "title": "x", "rating": "" }),
        )
        .unwrap();
        assert_eq!(record.rating, "NR");
    }

    #[test]
    fn genres_with_movie_references() {
        let body = json!({
            "data": [
                { "id": "drama", "title": "Drama", "movies": [{ "id": "1" }, { "id": "2" }] },
                { "id": "horror", "title": "Horror" }
            ]
        });
        let genres = validate::<GenresSchema>(&body).unwrap();
        assert_eq!(genres.data.len(), 2);
        assert_eq!(genres.data[0].movies.as_ref().map(Vec::len), Some(2));
        assert!(genres.data[1].movies.is_none());

        assert!(validate::<GenresSchema>(&json!({ "data": [] })).unwrap().data.is_empty());
        assert!(validate::<GenresSchema>(&json!({ "genres": [] })).is_err());
    }

    #[test]
    fn fractional_page_counts_are_rejected() {
        let err = validate::<MovieSearchSchema>(&json!({ "data": [], "totalPages": 2.5 }))
            .unwrap_err();
        assert!(err.violation_at("totalPages").is_some());

        let ok = validate::<MovieSearchSchema>(&json!({ "data": [], "totalPages": 4.0 }))
            .unwrap();
        assert_eq!(ok.total_pages, 4);
    }
}
