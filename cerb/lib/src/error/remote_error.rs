//! Failure envelopes reported by the server.

use thiserror::Error;

/// The server answered with `__status` other than `success`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cerb API error ({status}): {message}")]
pub struct RemoteApiError {
    /// The envelope's `__status` value.
    pub status: String,
    /// The envelope's `message` value.
    pub message: String,
}

impl RemoteApiError {
    /// Creates a remote error from a status discriminator and message.
    pub fn new(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            message: message.into(),
        }
    }
}
