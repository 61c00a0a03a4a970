//! HTTP client for the Cerb REST API.
//!
//! [`CerbClient`] owns request signing and envelope decoding. The
//! endpoint-specific operations live in sibling modules as further
//! `impl CerbClient` blocks:
//!
//! - `records` - generic record CRUD, upsert and search
//! - `contexts` - links, context listing and activity events
//! - `parser` - raw email parsing into tickets and replies
//! - `packages` - package import

mod contexts;
mod executor;
mod packages;
mod parser;
mod records;

pub use executor::{CerbClient, CerbClientBuilder, FORM_CONTENT_TYPE};
pub use parser::{DEFAULT_MESSAGE_BODY, compose_message};
pub use records::{DEFAULT_SEARCH_LIMIT, SearchQuery};
