//! Records module assembly, validation and writing.
//!
//! [`RecordsModuleBuilder`] turns a [`SchemaSnapshot`] into one Rust source
//! file:
//!
//! ```text
//! //! Auto generated on ..., Cerb Build: ...
//! use cerb::{...};
//! pub trait CerbRecord { ... }
//! static TICKET_DESCRIPTOR: RecordDescriptor = ...;
//! pub struct Ticket { record: Record }
//! impl CerbRecord for Ticket { ... }
//! impl Ticket { pub fn get_subject(&self) ... }
//! pub fn registry() -> RecordRegistry { ... }
//! ```
//!
//! The tokens are validated with `syn` and formatted with `prettyplease`
//! before being returned; the caller chooses where the text goes.

use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use proc_macro2::TokenStream;
use quote::quote;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::codegen::{
    generate_base_trait, generate_imports, generate_module_docs, generate_record_type,
    generate_registry_fn,
};
use crate::errors::GeneratorError;
use crate::introspect::SchemaSnapshot;
use crate::sanitize::sanitize_type_name;

/// Assigns a unique type name to each context, in order.
///
/// Collisions get a numeric suffix starting at 2 (`Widget`, `Widget2`).
pub fn assign_type_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut used = HashSet::new();
    names
        .into_iter()
        .map(|name| {
            let base = sanitize_type_name(name);
            let mut candidate = base.clone();
            let mut suffix = 2;
            while !used.insert(candidate.clone()) {
                candidate = format!("{base}{suffix}");
                suffix += 1;
            }
            candidate
        })
        .collect()
}

/// Renders the records module for a snapshot.
pub struct RecordsModuleBuilder<'a> {
    snapshot: &'a SchemaSnapshot,
}

impl<'a> RecordsModuleBuilder<'a> {
    pub fn new(snapshot: &'a SchemaSnapshot) -> Self {
        Self { snapshot }
    }

    /// Builds the unformatted module tokens.
    pub fn tokens(&self) -> TokenStream {
        let snapshot = self.snapshot;
        let docs =
            generate_module_docs(snapshot.captured_at, &snapshot.version, &snapshot.build);
        let imports = generate_imports();
        let base_trait = generate_base_trait();

        let type_names =
            assign_type_names(snapshot.contexts.iter().map(|d| d.context.name.as_str()));
        let record_types = snapshot
            .contexts
            .iter()
            .zip(&type_names)
            .map(|(discovered, type_name)| generate_record_type(discovered, type_name));
        let registry = generate_registry_fn(&type_names);

        quote! {
            #docs

            #imports

            #base_trait

            #(#record_types)*

            #registry
        }
    }

    /// Builds, validates and formats the module source.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::CodeGen`] if the generated tokens do not
    /// parse as a Rust file.
    pub fn build(&self) -> Result<String, GeneratorError> {
        let file = validate_code(&self.tokens())?;
        let code = format_code(&file, &self.snapshot.build);
        debug!(
            contexts = self.snapshot.contexts.len(),
            bytes = code.len(),
            "Rendered records module"
        );
        Ok(code)
    }
}

/// Parses the module tokens as a Rust file.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGen` naming the first syntax error.
pub fn validate_code(tokens: &TokenStream) -> Result<syn::File, GeneratorError> {
    syn::parse2(tokens.clone()).map_err(|e| {
        GeneratorError::CodeGen(format!("records module does not parse as Rust: {e}"))
    })
}

/// Pretty-prints the module behind a notice naming the Cerb build it
/// mirrors.
pub fn format_code(file: &syn::File, build: &str) -> String {
    format!(
        "// Generated by cerb-gen from Cerb build {build}. Edits are lost when \
         `cerb-gen records` runs again.\n\n{}",
        prettyplease::unparse(file)
    )
}

fn write_error(path: &Path) -> impl FnOnce(io::Error) -> GeneratorError + '_ {
    move |source| GeneratorError::Write {
        path: path.display().to_string(),
        source,
    }
}

/// Replaces `path` with `content` in one step.
///
/// The content is staged in a temp file next to `path`, synced, then
/// persisted over the target.
///
/// ## Errors
///
/// Returns `GeneratorError::Write` if the directory cannot be created or
/// the staged file cannot be written or persisted.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(write_error(dir))?;

    let mut staged = NamedTempFile::new_in(dir).map_err(write_error(dir))?;
    staged
        .write_all(content.as_bytes())
        .map_err(write_error(path))?;
    staged.as_file().sync_all().map_err(write_error(path))?;
    staged
        .persist(path)
        .map_err(|e| write_error(path)(e.error))?;

    debug!(path = %path.display(), bytes = content.len(), "Wrote generated output");
    Ok(())
}
