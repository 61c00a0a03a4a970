//! Layered error types for the Cerb client.
//!
//! The error hierarchy separates failures the caller handles differently:
//! - [`CerbError`] - Top-level error type for all client operations
//! - [`TransportError`] - Network failures and unreadable responses
//! - [`RemoteApiError`] - The server answered with a failure envelope
//! - [`ProtocolError`] - A response is missing fields the client relies on
//! - [`ConfigError`] - Invalid client configuration
//! - [`RecordError`] - Record lifecycle failures (lookup, permissions)

mod cerb_error;
mod config_error;
mod protocol_error;
mod record_error;
mod remote_error;
mod transport_error;

pub use cerb_error::CerbError;
pub use config_error::ConfigError;
pub use protocol_error::ProtocolError;
pub use record_error::RecordError;
pub use remote_error::RemoteApiError;
pub use transport_error::TransportError;
