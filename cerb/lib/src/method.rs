//! HTTP verbs accepted by the Cerb REST API.

use strum::{Display, EnumString};

/// HTTP methods used by Cerb endpoints.
///
/// The verb's uppercase name is the first line of the signed canonical
/// string, so [`Display`](std::fmt::Display) output is part of the wire
/// contract.
///
/// ## Examples
///
/// ```rust
/// use cerb::RestMethod;
///
/// assert_eq!(RestMethod::Patch.to_string(), "PATCH");
///
/// let parsed: RestMethod = "DELETE".parse().unwrap();
/// assert_eq!(parsed, RestMethod::Delete);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum RestMethod {
    /// Read a resource or run a search.
    Get,
    /// Create a record or trigger an action (link, parse, import).
    Post,
    /// Update an existing record.
    Put,
    /// Upsert a record by query.
    Patch,
    /// Delete a record.
    Delete,
}

impl RestMethod {
    /// Converts to the equivalent `reqwest::Method`.
    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl From<RestMethod> for reqwest::Method {
    fn from(method: RestMethod) -> Self {
        method.to_reqwest()
    }
}
