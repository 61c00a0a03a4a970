//! Client configuration errors.

use thiserror::Error;

/// Errors in client configuration.
///
/// These occur while building a [`CerbClient`](crate::CerbClient) and
/// usually indicate programmer error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A required configuration field is missing.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// A header name or value could not be encoded.
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader {
        /// The header name as supplied.
        name: String,
        /// Why the header was rejected.
        reason: String,
    },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl ConfigError {
    /// Creates a missing field error.
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Creates an invalid header error.
    pub fn invalid_header(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field() {
        let err = ConfigError::missing_field("base_url");
        assert_eq!(err.to_string(), "Missing required field: base_url");
    }

    #[test]
    fn test_invalid_url() {
        let url_err = url::Url::parse("not a url").unwrap_err();
        let err = ConfigError::InvalidUrl(url_err);
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_invalid_header() {
        let err = ConfigError::invalid_header("X-Bad\n", "invalid HTTP header name");
        assert!(err.to_string().starts_with("Invalid header 'X-Bad"));
    }
}
