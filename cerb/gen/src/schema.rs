//! Typed view of the `contexts/list` response.
//!
//! Cerb serializes PHP arrays, so ids arrive as numbers or strings and
//! lists sometimes arrive as objects keyed by id. The deserializers below
//! accept both shapes; every optional part defaults to empty.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One context (record type) as listed by Cerb.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaContext {
    #[serde(deserialize_with = "id_text")]
    pub id: String,
    #[serde(default, deserialize_with = "text_or_null")]
    pub name: String,
    #[serde(default, deserialize_with = "text_or_null")]
    pub plugin_id: String,
    #[serde(default, deserialize_with = "text_or_null")]
    pub alias: String,
    /// Raw `params` object (`names`, `acl`, `options`, ...).
    #[serde(default, deserialize_with = "object_or_empty")]
    pub params: Map<String, Value>,
    #[serde(default, deserialize_with = "list_or_map")]
    pub custom_fields: Vec<CustomField>,
    #[serde(default, deserialize_with = "list_or_map")]
    pub custom_fieldsets: Vec<CustomFieldset>,
}

/// A custom field declared on a context or fieldset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    #[serde(deserialize_with = "id_text")]
    pub id: String,
    #[serde(default, deserialize_with = "text_or_null")]
    pub name: String,
    /// Cerb type code (`S`, `N`, `D`, ...).
    #[serde(default, rename = "type", deserialize_with = "text_or_null")]
    pub kind: String,
}

impl CustomField {
    /// The record data key holding this field's value.
    pub fn storage_key(&self) -> String {
        format!("custom_{}", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldset {
    #[serde(deserialize_with = "id_text")]
    pub id: String,
    #[serde(default, deserialize_with = "text_or_null")]
    pub name: String,
    #[serde(default, deserialize_with = "list_or_map")]
    pub custom_fields: Vec<CustomField>,
}

impl SchemaContext {
    /// Operations listed in `params.acl`.
    pub fn acl(&self) -> Vec<&str> {
        self.params
            .get("acl")
            .and_then(Value::as_array)
            .map(|ops| ops.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn allows(&self, operation: &str) -> bool {
        self.acl().iter().any(|op| *op == operation)
    }

    /// `params` as compact JSON text.
    pub fn params_json(&self) -> String {
        Value::Object(self.params.clone()).to_string()
    }
}

fn id_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or numeric id, found {other}"
        ))),
    }
}

fn text_or_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn object_or_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Map<String, Value>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

fn list_or_map<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items: Vec<Value> = match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        other => {
            return Err(de::Error::custom(format!(
                "expected a list or object, found {other}"
            )));
        }
    };

    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(de::Error::custom))
        .collect()
}
