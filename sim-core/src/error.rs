//! Error types for `sim-core`.
//!
//! Every fallible operation returns one of these through [`Result`]. None of
//! them are recoverable inside a run; callers propagate them and stop.

use crate::types::{Field, Namespace};

/// Errors raised by [`crate::store::VariableStore`] and [`crate::field::FieldArray`].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StoreError {
    /// A field's leading dimension disagrees with the store's object count.
    #[error("field `{field}` has {actual} rows, expected {expected} (one per object)")]
    ShapeMismatch {
        /// The field being written or read.
        field: Field,
        /// Object count of the store.
        expected: usize,
        /// Leading dimension of the offending array.
        actual: usize,
    },

    /// Two fields that are combined column-wise disagree on their width.
    #[error("field `{field}` has {actual} columns, expected {expected}")]
    ColumnMismatch {
        /// The narrower or wider field.
        field: Field,
        /// Width of the reference field.
        expected: usize,
        /// Width of the offending field.
        actual: usize,
    },

    /// A field was read before it was ever written.
    #[error("unknown {namespace} field `{field}`")]
    UnknownField {
        /// The requested field.
        field: Field,
        /// Namespace that was searched.
        namespace: Namespace,
    },

    /// A store must hold at least one object.
    #[error("object count must be greater than zero")]
    EmptyPopulation,

    /// Disjoint mutable access was requested for the same field twice.
    #[error("field `{0}` requested twice for disjoint mutable access")]
    AliasedField(Field),

    /// Rows of different lengths were passed to [`crate::field::FieldArray::from_rows`].
    #[error("row {row} has {actual} columns, expected {expected}")]
    RaggedRows {
        /// Index of the first offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        actual: usize,
    },
}

/// Errors raised while validating a [`crate::config::Config`].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("object count must be greater than zero")]
    ZeroObjects,

    #[error("delta time must be finite, got {0}")]
    NonFiniteDeltaTime(f32),

    #[error("drawing size must be positive, got {0}")]
    NonPositiveDrawingSize(f32),
}

/// Top level error for building and running a [`crate::driver::Simulation`].
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = SimError> = std::result::Result<T, E>;
