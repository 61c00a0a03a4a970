//! Getter and setter generation for record wrappers.
//!
//! Accessors come from three sources, in this order:
//!
//! 1. Top-level fields of the example record, skipping names that start
//!    with `_` or contain `__` or `custom`
//! 2. Custom fields declared on the context (key `custom_<id>`)
//! 3. Custom fields inside fieldsets, named `<fieldset>_<field>`
//!
//! When two sources produce the same method name the later one wins.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use serde_json::{Map, Value};

use crate::sanitize::sanitize_identifier;
use crate::schema::SchemaContext;

/// One planned getter (and optional setter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    /// Sanitized name; methods are `get_<ident>` and `set_<ident>`.
    pub ident: String,
    /// Record data key read and written.
    pub key: String,
    pub settable: bool,
}

fn is_example_field(name: &str, value: &Value) -> bool {
    !name.starts_with('_')
        && !name.contains("__")
        && !name.contains("custom")
        && !value.is_object()
        && !value.is_array()
}

/// Plans the accessors of one context.
///
/// `example` is the first example record, when one was available.
pub fn plan_accessors(
    context: &SchemaContext,
    example: Option<&Map<String, Value>>,
) -> Vec<Accessor> {
    let settable = context.allows("update");

    let example_fields = example
        .into_iter()
        .flat_map(|record| record.iter())
        .filter(|(name, value)| is_example_field(name, value))
        .map(|(name, _)| (name.clone(), name.clone()));

    let custom_fields = context
        .custom_fields
        .iter()
        .map(|field| (field.name.clone(), field.storage_key()));

    let fieldset_fields = context.custom_fieldsets.iter().flat_map(|set| {
        set.custom_fields
            .iter()
            .map(move |field| (format!("{}_{}", set.name, field.name), field.storage_key()))
    });

    let mut planned: Vec<Accessor> = Vec::new();
    for (label, key) in example_fields.chain(custom_fields).chain(fieldset_fields) {
        let ident = sanitize_identifier(&label);
        planned.retain(|existing| existing.ident != ident);
        planned.push(Accessor {
            ident,
            key,
            settable,
        });
    }
    planned
}

/// Generates the getter/setter methods for `accessors`.
///
/// Getters return `Option<&Value>`; setters update one field remotely and
/// then reload the record.
pub fn generate_accessors(accessors: &[Accessor]) -> TokenStream {
    let methods = accessors.iter().map(|accessor| {
        let getter = format_ident!("get_{}", accessor.ident);
        let key = &accessor.key;
        let get_doc = format!(" Reads `{key}`.");

        let setter = accessor.settable.then(|| {
            let setter = format_ident!("set_{}", accessor.ident);
            let set_doc = format!(" Updates `{key}` on the server, then reloads.");
            quote! {
                #[doc = #set_doc]
                pub async fn #setter(&mut self, value: impl Into<Value>) -> Result<(), CerbError> {
                    self.record.update_field(#key, value.into()).await?;
                    self.record.reload().await
                }
            }
        });

        quote! {
            #[doc = #get_doc]
            pub fn #getter(&self) -> Option<&Value> {
                self.record.get(#key)
            }

            #setter
        }
    });

    quote! { #(#methods)* }
}
