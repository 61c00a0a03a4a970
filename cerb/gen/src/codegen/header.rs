//! Module header: generation notice and imports.

use chrono::{DateTime, Utc};
use proc_macro2::TokenStream;
use quote::quote;

/// Generates the `//!` docs naming the capture time and Cerb build.
pub fn generate_module_docs(captured_at: DateTime<Utc>, version: &str, build: &str) -> TokenStream {
    let notice = format!(
        " Auto generated on {}, Cerb Build: {build} (version {version}).",
        captured_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let usage = " Record types for one Cerb instance. Regenerate with `cerb-gen records` \
                 whenever contexts or custom fields change.";

    quote! {
        #![doc = #notice]
        #![doc = ""]
        #![doc = #usage]
    }
}

/// Generates the `use` items every generated module needs.
pub fn generate_imports() -> TokenStream {
    quote! {
        use cerb::{CerbClient, CerbError, Fields, Map, Record, RecordDescriptor, RecordRegistry, Value};
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn docs_name_build_and_time() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 10, 0, 0).unwrap();
        let code = generate_module_docs(at, "10.4", "2026101901").to_string();
        assert!(code.contains("Auto generated on 2026-10-19 10:00:00 UTC, Cerb Build: 2026101901 (version 10.4)."));
    }
}
