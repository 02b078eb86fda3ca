use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

/// Every failure a catalog operation can surface to its caller.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The token endpoint could not supply a usable credential.
    #[error("Failed to fetch token: {0}")]
    AuthFetch(#[from] AuthFetchError),

    /// The catalog answered with a non-2xx status.
    #[error("{message}")]
    Api {
        status: StatusCode,
        status_text: String,
        message: String,
    },

    /// The transport failed before a response arrived.
    #[error("Network error occurred: {0}")]
    Network(#[from] reqwest::Error),

    /// The body was JSON but did not match the endpoint's schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The body was not JSON at all.
    #[error(transparent)]
    Decode(#[from] serde_json::Error),

    /// The caller's cancellation token fired while the request was in flight.
    #[error("Request cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    pub(crate) fn api(what: &str, status: StatusCode) -> Self {
        Self::Api {
            status,
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            message: format!("Failed to fetch {what}: {status}"),
        }
    }

    /// HTTP status of an [`CatalogError::Api`] failure.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_api_error(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    pub fn is_network_error(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Short, human readable explanation suitable for end users.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api {
                status, message, ..
            } => match status.as_u16() {
                401 => "Authentication failed. Please try again.".into(),
                403 => "Access denied.".into(),
                404 => "Resource not found.".into(),
                429 => "Too many requests. Please wait a moment.".into(),
                500 | 502 | 503 => {
                    "Server error. Please try again later.".into()
                }
                _ if message.is_empty() => "An error occurred.".into(),
                _ => message.clone(),
            },
            Self::Network(_) => {
                "Network error. Please check your connection.".into()
            }
            Self::AuthFetch(_) | Self::Validation(_) => self.to_string(),
            Self::Decode(_) | Self::Cancelled => {
                "An unexpected error occurred.".into()
            }
        }
    }
}

/// Why the token endpoint failed to produce a credential.
#[derive(Debug, Error)]
pub enum AuthFetchError {
    #[error("token endpoint unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("{status}")]
    Status { status: StatusCode },

    #[error("token response is not JSON: {0}")]
    Decode(#[source] serde_json::Error),

    #[error(transparent)]
    InvalidBody(ValidationError),
}

/// A payload that failed schema validation, with every violation found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{context}")]
pub struct ValidationError {
    pub context: String,
    pub violations: Vec<SchemaViolation>,
}

impl ValidationError {
    pub fn new(
        context: impl Into<String>,
        violations: Vec<SchemaViolation>,
    ) -> Self {
        Self {
            context: context.into(),
            violations,
        }
    }

    /// Violation located at exactly `path`, if any.
    pub fn violation_at(&self, path: &str) -> Option<&SchemaViolation> {
        self.violations.iter().find(|v| v.path == path)
    }
}

/// A single schema failure. `path` uses `data[2].title` notation; the root
/// is `$`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub path: String,
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_map_to_short_messages() {
        let cases = [
            (401, "Authentication failed. Please try again."),
            (403, "Access denied."),
            (404, "Resource not found."),
            (429, "Too many requests. Please wait a moment."),
            (500, "Server error. Please try again later."),
            (502, "Server error. Please try again later."),
            (503, "Server error. Please try again later."),
        ];
        for (code, expected) in cases {
            let status = StatusCode::from_u16(code).unwrap();
            assert_eq!(CatalogError::api("movies", status).user_message(), expected);
        }
    }

    #[test]
    fn unlisted_status_keeps_operation_message() {
        let err = CatalogError::api("movie", StatusCode::IM_A_TEAPOT);
        assert_eq!(err.user_message(), "Failed to fetch movie: 418 I'm a teapot");
        assert_eq!(err.status(), Some(StatusCode::IM_A_TEAPOT));
        assert!(err.is_api_error());
        assert!(!err.is_network_error());
    }

    #[test]
    fn api_message_carries_the_status_code() {
        let err = CatalogError::api("movie", StatusCode::NOT_FOUND);
        assert!(err.to_string().contains("404"));
        assert!(err.is_not_found());
        match err {
            CatalogError::Api { status_text, .. } => assert_eq!(status_text, "Not Found"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn decode_and_cancel_fall_back_to_generic_message() {
        let decode = serde_json::from_str::<serde_json::Value>("<html>")
            .map_err(CatalogError::from)
            .unwrap_err();
        assert_eq!(decode.user_message(), "An unexpected error occurred.");
        assert_eq!(CatalogError::Cancelled.user_message(), "An unexpected error occurred.");
    }

    #[test]
    fn auth_and_validation_errors_use_their_own_message() {
        let auth = CatalogError::from(AuthFetchError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
        });
        assert_eq!(auth.user_message(), "Failed to fetch token: 503 Service Unavailable");

        let invalid = CatalogError::from(ValidationError::new("Invalid genres response", Vec::new()));
        assert_eq!(invalid.user_message(), "Invalid genres response");
    }
}
