//! Pure helpers that turn raw catalog values into display strings.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::movie::{Genre, NOT_AVAILABLE, UNKNOWN_GENRE};

// Hours and minutes only; the catalog never reports days or seconds.
static ISO_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?")
        .expect("duration pattern is a valid regex")
});

/// Total minutes of an ISO-8601 duration such as `"PT1H43M"`.
///
/// A missing hour or minute component counts as zero, so `"PT45M"` is 45.
/// Returns `None` for absent or empty input, for strings without the `PT`
/// designator, and for component values too large to represent.
pub fn parse_duration(iso_duration: Option<&str>) -> Option<i64> {
    let raw = iso_duration.filter(|value| !value.is_empty())?;
    let captures = ISO_DURATION.captures(raw)?;

    let component = |index| {
        captures
            .get(index)
            .map_or(Ok(0), |m| m.as_str().parse::<i64>())
    };
    let hours = component(1).ok()?;
    let minutes = component(2).ok()?;

    hours.checked_mul(60)?.checked_add(minutes)
}

/// `"1h 43m"`, `"2h"` or `"45m"`; `"N/A"` for non-positive or unknown input.
pub fn format_duration(minutes: Option<i64>) -> String {
    match minutes {
        Some(total) if total > 0 => match (total / 60, total % 60) {
            (0, mins) => format!("{mins}m"),
            (hours, 0) => format!("{hours}h"),
            (hours, mins) => format!("{hours}h {mins}m"),
        },
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_iso_duration(iso_duration: Option<&str>) -> String {
    format_duration(parse_duration(iso_duration))
}

/// Calendar year of a catalog date, or 0 when the value is absent or does
/// not parse.
///
/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS` timestamps, and
/// the date prefixes `YYYY-MM-DD`, `YYYY-MM` and `YYYY`.
pub fn extract_year(date: Option<&str>) -> i32 {
    let Some(raw) = date.map(str::trim).filter(|value| !value.is_empty())
    else {
        return 0;
    };

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return timestamp.year();
    }
    if let Ok(timestamp) =
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
    {
        return timestamp.year();
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return day.year();
    }
    if let Ok(month) = NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
    {
        return month.year();
    }
    if raw.len() == 4 && raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.parse().unwrap_or(0);
    }

    0
}

/// `"7.2/10"`; `"N/A"` when the score is absent or exactly zero.
///
/// Exact ties round away from zero, so `7.25` shows as `"7.3/10"`.
pub fn format_rating(value: Option<f64>) -> String {
    match value {
        Some(score) if score != 0.0 => {
            format!("{:.1}/10", round_tenths_half_up(score))
        }
        _ => NOT_AVAILABLE.to_string(),
    }
}

// `{:.1}` rounds exact ties to even. A binary score sits exactly halfway
// between two tenths only when it is an odd multiple of 0.25; every other
// value is already rounded correctly by the formatter.
fn round_tenths_half_up(score: f64) -> f64 {
    let quarters = score * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        (score * 10.0).round() / 10.0
    } else {
        score
    }
}

/// Genre titles joined with `", "` in catalog order, `"Unknown"` when empty.
pub fn join_genre_names(genres: &[Genre]) -> String {
    if genres.is_empty() {
        return UNKNOWN_GENRE.to_string();
    }
    genres
        .iter()
        .map(|genre| genre.title.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
