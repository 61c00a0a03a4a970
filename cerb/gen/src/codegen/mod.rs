//! Code generation for the records module.
//!
//! - [`header`] - module docs and imports
//! - [`base_trait`] - the shared `CerbRecord` trait
//! - [`record_struct`] - one wrapper type per context
//! - [`accessors`] - getters and setters
//! - [`registry`] - the `registry()` function

pub mod accessors;
pub mod base_trait;
pub mod header;
pub mod record_struct;
pub mod registry;

pub use accessors::{Accessor, generate_accessors, plan_accessors};
pub use base_trait::generate_base_trait;
pub use header::{generate_imports, generate_module_docs};
pub use record_struct::{descriptor_ident, generate_descriptor, generate_record_type};
pub use registry::generate_registry_fn;
