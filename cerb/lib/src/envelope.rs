//! JSON response envelope.
//!
//! Every Cerb response is a JSON object. Metadata keys start with `__`
//! (`__status`, `__version`, `__build`); failures carry
//! `__status != "success"` plus a human-readable `message`.

use serde_json::{Map, Value};

use crate::error::{ProtocolError, RemoteApiError, TransportError};

/// The `__status` value of a successful envelope.
pub const STATUS_SUCCESS: &str = "success";

const STATUS_KEY: &str = "__status";
const MESSAGE_KEY: &str = "message";

/// A parsed response object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Envelope(Map<String, Value>);

impl Envelope {
    /// Wraps an already-parsed JSON object.
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Parses a response body.
    ///
    /// ## Errors
    ///
    /// Returns [`TransportError::InvalidJson`] unless the body is a JSON object.
    pub fn parse(body: &str) -> Result<Self, TransportError> {
        let map: Map<String, Value> = serde_json::from_str(body)?;
        Ok(Self(map))
    }

    /// Fails with [`RemoteApiError`] when `__status` is present and not the
    /// string `success`.
    ///
    /// Envelopes without a status discriminator pass through unchanged. A
    /// non-string status is reported by its JSON text.
    pub fn check_status(self) -> Result<Self, RemoteApiError> {
        let failure = match self.0.get(STATUS_KEY) {
            None => None,
            Some(Value::String(s)) if s == STATUS_SUCCESS => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };

        match failure {
            None => Ok(self),
            Some(status) => Err(RemoteApiError::new(
                status,
                self.message().unwrap_or_default(),
            )),
        }
    }

    /// The `message` field, if any.
    pub fn message(&self) -> Option<&str> {
        self.0.get(MESSAGE_KEY).and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a string field, accepting numbers as their JSON text.
    ///
    /// ## Errors
    ///
    /// Returns [`ProtocolError`] when the field is absent or not a scalar.
    pub fn require_str(&self, key: &str) -> Result<String, ProtocolError> {
        match self.0.get(key) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(_) => Err(ProtocolError::unexpected_type(key, "a string")),
            None => Err(ProtocolError::missing_field(key)),
        }
    }

    /// The `results` array of list and search responses.
    ///
    /// ## Errors
    ///
    /// Returns [`ProtocolError`] when `results` is absent or not an array.
    pub fn results(&self) -> Result<&[Value], ProtocolError> {
        match self.0.get("results") {
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(ProtocolError::unexpected_type("results", "an array")),
            None => Err(ProtocolError::missing_field("results")),
        }
    }

    /// Consumes the envelope, returning the raw object.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Consumes the envelope, dropping `__`-prefixed metadata keys.
    pub fn into_record_data(self) -> Map<String, Value> {
        self.0
            .into_iter()
            .filter(|(k, _)| !k.starts_with("__"))
            .collect()
    }
}

impl From<Map<String, Value>> for Envelope {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl AsRef<Map<String, Value>> for Envelope {
    fn as_ref(&self) -> &Map<String, Value> {
        &self.0
    }
}
