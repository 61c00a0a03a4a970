//! Signed REST client for the Cerb ticketing platform.
//!
//! The `cerb` crate talks to the Cerb REST API. Every request is signed with
//! the `Cerb-Auth` scheme: an MD5 digest over the verb, date, path, query,
//! body and a digest of the shared secret.
//!
//! ## Features
//!
//! - **Request signing**: [`signature`] builds the canonical string and token
//! - **Async client**: [`CerbClient`] built on `reqwest`, probing the server
//!   version and build on connect
//! - **Typed errors**: transport, remote API, protocol and configuration
//!   failures are distinct [`CerbError`] variants
//! - **Record runtime**: [`Record`] and [`RecordRegistry`] back the wrapper
//!   modules emitted by `cerb-gen`
//!
//! ## Example
//!
//! ```rust,ignore
//! use cerb::{CerbClient, SearchQuery};
//!
//! let client = CerbClient::builder("my-access-key", "my-secret")
//!     .base_url("https://cerb.example.com/rest/")
//!     .connect()
//!     .await?;
//!
//! println!("Cerb {} (build {})", client.version(), client.build());
//!
//! let tickets = client
//!     .search_records("ticket", &SearchQuery::new().query("status:open").limit(10))
//!     .await?;
//! ```

pub mod client;
pub mod credentials;
pub mod envelope;
pub mod error;
pub mod form;
pub mod method;
pub mod record;
pub mod signature;

/// Default REST base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://localhost/index.php/rest/";

/// Name of the authentication header carrying `{access_key}:{signature}`.
pub const AUTH_HEADER: &str = "Cerb-Auth";

// Re-exports for convenience
pub use client::{CerbClient, CerbClientBuilder, SearchQuery};
pub use credentials::Credentials;
pub use envelope::Envelope;
pub use error::{
    CerbError, ConfigError, ProtocolError, RecordError, RemoteApiError, TransportError,
};
pub use form::{Fields, FormPairs};
pub use method::RestMethod;
pub use record::{
    CustomFieldDescriptor, CustomFieldsetDescriptor, Record, RecordDescriptor, RecordRegistry,
};
pub use serde_json::{Map, Value};
