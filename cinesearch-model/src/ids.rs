use std::fmt;

/// Catalog identifier of a movie. Opaque to this crate; the upstream service
/// decides its shape.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MovieId(pub String);

impl MovieId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Blank ids (empty or whitespace only) can never address a movie.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl AsRef<str> for MovieId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for MovieId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for MovieId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Catalog identifier of a genre (e.g. `"drama"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct GenreId(pub String);

impl GenreId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for GenreId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for GenreId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for GenreId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for GenreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_ids_are_detected() {
        assert!(MovieId::new("").is_blank());
        assert!(MovieId::new("   ").is_blank());
        assert!(!MovieId::new("tt0111161").is_blank());
    }

    #[test]
    fn ids_display_their_raw_value() {
        assert_eq!(MovieId::from("abc").to_string(), "abc");
        assert_eq!(GenreId::from("drama").as_str(), "drama");
    }
}
