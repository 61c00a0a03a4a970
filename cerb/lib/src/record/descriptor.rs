//! Static metadata describing one Cerb context.

use serde_json::Value;

use crate::error::RecordError;

/// A custom field declared on a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomFieldDescriptor {
    /// Custom field id, as text.
    pub id: &'static str,
    pub name: &'static str,
    /// Cerb field type code (e.g. `S` for single-line text).
    pub kind: &'static str,
}

impl CustomFieldDescriptor {
    /// The record data key holding this field's value (`custom_<id>`).
    pub fn storage_key(&self) -> String {
        format!("custom_{}", self.id)
    }
}

/// A named group of custom fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomFieldsetDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub custom_fields: &'static [CustomFieldDescriptor],
}

/// Everything the generator learned about one context.
///
/// Generated modules declare one `static` descriptor per context, so every
/// field borrows for `'static`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordDescriptor {
    /// Context id, e.g. `cerberusweb.contexts.ticket`.
    pub context_id: &'static str,
    /// Display name, e.g. `Ticket`.
    pub name: &'static str,
    /// Name of the generated wrapper type.
    pub type_name: &'static str,
    pub plugin_id: &'static str,
    /// URI alias used by the records endpoints, e.g. `ticket`.
    pub alias: &'static str,
    /// Operations the context permits (`create`, `update`, ...).
    pub acl: &'static [&'static str],
    /// The context's `params` object, as JSON text.
    pub params_json: &'static str,
    pub custom_fields: &'static [CustomFieldDescriptor],
    pub custom_fieldsets: &'static [CustomFieldsetDescriptor],
}

impl RecordDescriptor {
    /// Returns `true` if the ACL lists `operation`.
    pub fn allows(&self, operation: &str) -> bool {
        self.acl.iter().any(|entry| *entry == operation)
    }

    /// Fails with [`RecordError::NotPermitted`] unless the ACL lists `operation`.
    pub fn require(&self, operation: &str) -> Result<(), RecordError> {
        if self.allows(operation) {
            Ok(())
        } else {
            Err(RecordError::NotPermitted {
                type_name: self.type_name.to_string(),
                operation: operation.to_string(),
            })
        }
    }

    /// Parses [`params_json`](Self::params_json).
    pub fn params(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(self.params_json)
    }

    /// Every custom field, including those inside fieldsets.
    pub fn all_custom_fields(&self) -> impl Iterator<Item = &'static CustomFieldDescriptor> {
        self.custom_fields.iter().chain(
            self.custom_fieldsets
                .iter()
                .flat_map(|set| set.custom_fields.iter()),
        )
    }
}
