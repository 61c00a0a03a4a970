//! Record lifecycle errors.

use thiserror::Error;

/// Errors raised by [`Record`](crate::Record) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Server data carried no usable numeric `id`.
    #[error("{type_name} data has no numeric 'id'")]
    MissingId {
        /// Generated type name of the record.
        type_name: String,
    },

    /// A single-record lookup matched nothing.
    #[error("{type_name} find_one found no match for query '{query}'")]
    NotFound {
        /// Generated type name of the record.
        type_name: String,
        /// The search query.
        query: String,
    },

    /// A single-record lookup matched more than one record.
    #[error("{type_name} find_one found {count} matches for query '{query}'")]
    Ambiguous {
        /// Generated type name of the record.
        type_name: String,
        /// The search query.
        query: String,
        /// Number of records matched.
        count: usize,
    },

    /// The record type's ACL does not allow the operation.
    #[error("{type_name} does not allow '{operation}'")]
    NotPermitted {
        /// Generated type name of the record.
        type_name: String,
        /// The denied operation, as named in the ACL.
        operation: String,
    },
}
