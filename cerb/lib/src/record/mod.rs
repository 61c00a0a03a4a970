//! Runtime support for generated record wrappers.
//!
//! `cerb-gen` emits one wrapper type per Cerb context. Each wrapper holds a
//! [`Record`] and a `static` [`RecordDescriptor`]; the lifecycle (load,
//! search, create, update, links) lives here so the generated code stays
//! small. [`RecordRegistry`] maps context ids to descriptors.

mod descriptor;
mod handle;
mod registry;

pub use descriptor::{CustomFieldDescriptor, CustomFieldsetDescriptor, RecordDescriptor};
pub use handle::{FIND_LIMIT, LINK_CHUNK_SIZE, Record};
pub use registry::RecordRegistry;
