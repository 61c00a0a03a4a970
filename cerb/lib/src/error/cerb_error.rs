//! Top-level client error type.

use super::{ConfigError, ProtocolError, RecordError, RemoteApiError, TransportError};
use thiserror::Error;

/// Top-level error type for all Cerb client operations.
///
/// Client-level errors always surface to the caller; nothing here is
/// retried or swallowed by the library.
///
/// ## Examples
///
/// ```rust,ignore
/// use cerb::CerbError;
///
/// match client.get_contexts().await {
///     Ok(envelope) => println!("{} contexts", envelope.results()?.len()),
///     Err(CerbError::RemoteApi(e)) => eprintln!("Cerb refused: {}", e.message),
///     Err(CerbError::Transport(e)) => eprintln!("Network failure: {e}"),
///     Err(other) => eprintln!("{other}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum CerbError {
    /// Network, TLS, DNS or body decoding failures.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server reported a non-success status in the envelope.
    #[error(transparent)]
    RemoteApi(#[from] RemoteApiError),

    /// A response lacked fields the client depends on.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Invalid client configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Record lifecycle failures.
    #[error(transparent)]
    Record(#[from] RecordError),
}

impl CerbError {
    /// Returns the remote failure if this error came from a failure envelope.
    pub fn as_remote(&self) -> Option<&RemoteApiError> {
        match self {
            Self::RemoteApi(e) => Some(e),
            _ => None,
        }
    }
}
