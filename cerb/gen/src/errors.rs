//! Error types for the cerb generator.

use cerb::CerbError;
use thiserror::Error;

/// Errors that abort a generator run.
///
/// Per-context problems (an inaccessible example search, a context that
/// fails to deserialize) are recovered and reported in the output instead.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The Cerb client failed (connect, list contexts, transport).
    #[error(transparent)]
    Client(#[from] CerbError),

    /// Failed to generate code
    #[error("Code generation failed: {0}")]
    CodeGen(String),

    /// Failed to write output file
    #[error("Failed to write output file '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}
