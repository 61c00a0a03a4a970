//! Responses that parse but lack expected fields.

use thiserror::Error;

/// A successful envelope is missing data the client depends on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// A required envelope field was absent.
    #[error("Response is missing field '{field}'")]
    MissingField {
        /// The missing field name.
        field: String,
    },

    /// A field was present with the wrong JSON type.
    #[error("Response field '{field}' is not {expected}")]
    UnexpectedType {
        /// The offending field name.
        field: String,
        /// Human-readable expected type.
        expected: &'static str,
    },
}

impl ProtocolError {
    /// Creates a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates an unexpected type error.
    pub fn unexpected_type(field: impl Into<String>, expected: &'static str) -> Self {
        Self::UnexpectedType {
            field: field.into(),
            expected,
        }
    }
}
