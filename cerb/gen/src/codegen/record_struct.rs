//! Per-context wrapper generation.
//!
//! Each context becomes a `static` descriptor, a newtype around
//! `cerb::Record`, a `CerbRecord` impl and an inherent impl with its
//! accessors.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::accessors::{generate_accessors, plan_accessors};
use crate::introspect::{DiscoveredContext, Examples};
use crate::sanitize::const_name;
use crate::schema::{CustomField, SchemaContext};

/// Name of the descriptor static for `type_name`.
pub fn descriptor_ident(type_name: &str) -> proc_macro2::Ident {
    format_ident!("{}_DESCRIPTOR", const_name(type_name))
}

fn custom_field_tokens(field: &CustomField) -> TokenStream {
    let id = &field.id;
    let name = &field.name;
    let kind = &field.kind;
    quote! {
        cerb::CustomFieldDescriptor { id: #id, name: #name, kind: #kind }
    }
}

/// Generates the `static` [`cerb::RecordDescriptor`] for a context.
pub fn generate_descriptor(context: &SchemaContext, type_name: &str) -> TokenStream {
    let ident = descriptor_ident(type_name);
    let context_id = &context.id;
    let name = &context.name;
    let plugin_id = &context.plugin_id;
    let alias = &context.alias;
    let acl = context.acl();
    let params_json = context.params_json();
    let custom_fields = context.custom_fields.iter().map(custom_field_tokens);
    let fieldsets = context.custom_fieldsets.iter().map(|set| {
        let id = &set.id;
        let name = &set.name;
        let fields = set.custom_fields.iter().map(custom_field_tokens);
        quote! {
            cerb::CustomFieldsetDescriptor {
                id: #id,
                name: #name,
                custom_fields: &[#(#fields),*],
            }
        }
    });

    quote! {
        static #ident: RecordDescriptor = RecordDescriptor {
            context_id: #context_id,
            name: #name,
            type_name: #type_name,
            plugin_id: #plugin_id,
            alias: #alias,
            acl: &[#(#acl),*],
            params_json: #params_json,
            custom_fields: &[#(#custom_fields),*],
            custom_fieldsets: &[#(#fieldsets),*],
        };
    }
}

fn struct_docs(discovered: &DiscoveredContext) -> Vec<String> {
    let context = &discovered.context;
    let mut docs = vec![format!(" {} (`{}`).", context.name, context.id)];
    match &discovered.examples {
        Examples::Found(_) => {}
        Examples::Empty => {
            docs.push(String::new());
            docs.push(" No example records to build accessors from.".to_string());
        }
        Examples::Inaccessible(e) => {
            docs.push(String::new());
            docs.push(format!(" Example records unavailable: {e}"));
        }
    }
    docs
}

/// Generates the full wrapper for one discovered context.
pub fn generate_record_type(discovered: &DiscoveredContext, type_name: &str) -> TokenStream {
    let context = &discovered.context;
    let type_ident = format_ident!("{}", type_name);
    let descriptor = generate_descriptor(context, type_name);
    let descriptor_ident = descriptor_ident(type_name);
    let docs = struct_docs(discovered);

    let accessors = plan_accessors(context, discovered.examples.first());
    let accessor_impl = (!accessors.is_empty()).then(|| {
        let methods = generate_accessors(&accessors);
        quote! {
            impl #type_ident {
                #methods
            }
        }
    });

    quote! {
        #descriptor

        #(#[doc = #docs])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct #type_ident {
            record: Record,
        }

        impl CerbRecord for #type_ident {
            fn descriptor() -> &'static RecordDescriptor {
                &#descriptor_ident
            }

            fn from_record(record: Record) -> Self {
                Self { record }
            }

            fn record(&self) -> &Record {
                &self.record
            }

            fn record_mut(&mut self) -> &mut Record {
                &mut self.record
            }
        }

        #accessor_impl
    }
}
