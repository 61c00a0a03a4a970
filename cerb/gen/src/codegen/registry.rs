//! The `registry()` function of a generated module.

use proc_macro2::TokenStream;
use quote::quote;

use super::record_struct::descriptor_ident;

/// Generates `pub fn registry() -> RecordRegistry` registering every type.
pub fn generate_registry_fn(type_names: &[String]) -> TokenStream {
    let descriptors = type_names.iter().map(|name| descriptor_ident(name));

    quote! {
        /// Registry of every record type in this module, keyed by context id.
        pub fn registry() -> RecordRegistry {
            RecordRegistry::new()
                #(.with(&#descriptors))*
        }
    }
}
