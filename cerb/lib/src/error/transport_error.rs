//! Network and response decoding errors.

use thiserror::Error;

/// Errors from the transport layer.
///
/// These cover everything between "the request was built" and "the body
/// parsed as JSON": connection failures, non-2xx responses that do not
/// carry a failure envelope, and bodies that are not UTF-8 JSON.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed due to a network or protocol error.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned a non-success status without a failure envelope.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code returned.
        status: u16,
        /// The raw response body.
        body: String,
    },

    /// Response body was not valid UTF-8.
    #[error("Response body is not UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// Response body was not a JSON object.
    #[error("Response body is not a JSON object: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl TransportError {
    /// Returns the HTTP status code when one is known.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` for connection-level failures (DNS, TLS, refused, timeout).
    pub fn is_connection(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_code() {
        let err = TransportError::HttpStatus {
            status: 502,
            body: "<html>Bad Gateway</html>".to_string(),
        };
        assert_eq!(err.status_code(), Some(502));
        assert!(!err.is_connection());
        assert_eq!(err.to_string(), "HTTP 502: <html>Bad Gateway</html>");
    }

    #[test]
    fn test_invalid_json_has_no_status() {
        let json_err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err = TransportError::InvalidJson(json_err);
        assert_eq!(err.status_code(), None);
        assert!(err.to_string().starts_with("Response body is not a JSON object"));
    }
}
