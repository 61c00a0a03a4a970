//! Cerb record generator library.
//!
//! This crate reads the schema of a live Cerb instance and emits two
//! artifacts:
//!
//! - A Rust **records module**: one wrapper type per context, each backed
//!   by [`cerb::Record`], with getters and setters inferred from example
//!   records and custom fields
//! - A plain-text **cheat sheet** listing every context and a few example
//!   records
//!
//! ## Modules
//!
//! - [`introspect`] - Schema discovery against a connected client
//! - [`schema`] - Typed view of a `contexts/list` entry
//! - [`codegen`] - Token generation for the records module
//! - [`output`] - Final assembly, validation, and file writing
//! - [`cheat_sheet`] - Cheat sheet rendering
//! - [`sanitize`] - Identifier and type name sanitizing
//! - [`errors`] - Error types for the generator
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use cerb::CerbClient;
//! use cerb_gen::introspect::{ExampleQuery, Introspector};
//! use cerb_gen::output::RecordsModuleBuilder;
//!
//! let client = CerbClient::connect("key", "secret", "https://cerb.example.com/rest/").await?;
//! let snapshot = Introspector::new(&client).snapshot(ExampleQuery::RECORDS).await?;
//! let code = RecordsModuleBuilder::new(&snapshot).build()?;
//! println!("{code}");
//! ```
//!
//! ## Generated Code Structure
//!
//! For a Cerb instance with a `Ticket` context:
//!
//! ```text
//! pub trait CerbRecord { ... }
//!
//! static TICKET_DESCRIPTOR: RecordDescriptor = RecordDescriptor { ... };
//!
//! pub struct Ticket { record: Record }
//! impl CerbRecord for Ticket { ... }
//! impl Ticket {
//!     pub fn get_subject(&self) -> Option<&Value> { ... }
//!     pub async fn set_subject(&mut self, value: impl Into<Value>) -> Result<(), CerbError> { ... }
//! }
//!
//! pub fn registry() -> RecordRegistry { ... }
//! ```

pub mod cheat_sheet;
pub mod codegen;
pub mod errors;
pub mod introspect;
pub mod output;
pub mod sanitize;
pub mod schema;

pub use cheat_sheet::CheatSheetBuilder;
pub use errors::GeneratorError;
pub use introspect::{ExampleQuery, Introspector, SchemaSnapshot};
pub use output::RecordsModuleBuilder;
