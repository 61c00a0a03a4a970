//! URL-encoded form pairs for query strings and request bodies.
//!
//! Cerb signs the exact query and body bytes, so pair order is part of the
//! contract. [`FormPairs`] keeps insertion order; [`flatten_fields`] sorts
//! record fields by key so equal field maps always encode identically.

use std::collections::BTreeMap;

use serde_json::Value;
use url::form_urlencoded;

/// Record field values keyed by field name.
pub type Fields = BTreeMap<String, Value>;

/// Ordered list of form name/value pairs.
///
/// ## Examples
///
/// ```rust
/// use cerb::FormPairs;
///
/// let pairs = FormPairs::new().with("expand", "custom_,links").with("q", "status:o");
/// assert_eq!(pairs.encode(), "expand=custom_%2Clinks&q=status%3Ao");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPairs(Vec<(String, String)>);

impl FormPairs {
    /// Creates an empty pair list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a pair.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Appends a pair, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// Appends every pair of `other`, keeping its order.
    pub fn extend(&mut self, other: FormPairs) {
        self.0.extend(other.0);
    }

    /// Returns the value of the first pair named `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Serializes as `application/x-www-form-urlencoded`.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for FormPairs {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        )
    }
}

/// Converts a JSON value to the string sent in a form field.
///
/// Strings are sent verbatim, booleans as `1`/`0`, null as an empty
/// string, and arrays or objects as compact JSON.
pub fn form_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Flattens record fields into `fields[<key>]` pairs, sorted by key.
///
/// Sorting makes the encoded body, and therefore the signature, independent
/// of the caller's map type or insertion order.
pub fn flatten_fields<'a, I>(fields: I) -> FormPairs
where
    I: IntoIterator<Item = (&'a String, &'a Value)>,
{
    let sorted: BTreeMap<&str, &Value> = fields
        .into_iter()
        .map(|(k, v)| (k.as_str(), v))
        .collect();

    sorted
        .into_iter()
        .map(|(k, v)| (format!("fields[{k}]"), form_value(v)))
        .collect()
}
