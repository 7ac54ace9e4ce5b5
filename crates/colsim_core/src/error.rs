//! Error types for the simulation engine.

use colsim_model::ShapeId;
use thiserror::Error;

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;

/// Errors that abort the evaluation of one (dataset, strategy) pair.
///
/// Schema violations (`ColumnOverflow`, `FieldAlreadyPacked`,
/// `RouteOutOfRange`) indicate a bug in the strategy's layout logic.
/// Consistency violations (`BitCountMismatch`, `ShapeCountMismatch`)
/// mean the strategy's replay corrupted the row multiset, so its score
/// is meaningless. Neither is retried; sibling evaluations continue.
///
/// A segment reaching its size cap is deliberately *not* an error:
/// [`Segment::try_add`](crate::Segment::try_add) reports it as `false`
/// and callers open a new segment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    /// A column's packed fields exceed the 32-bit budget.
    #[error("column {column} is using {bits} bits (budget is 32)")]
    ColumnOverflow {
        /// Offending column.
        column: usize,
        /// Total bits of field width assigned to it.
        bits: u32,
    },

    /// The same field instance was packed twice.
    #[error("field '{name}' (index {index}) already packed")]
    FieldAlreadyPacked {
        /// Field name, for reporting.
        name: String,
        /// The field's immutable identity.
        index: usize,
    },

    /// A multiplexing route points past the packer list.
    #[error("route for {shape} targets packer {route}, but only {packers} packers exist")]
    RouteOutOfRange {
        /// Shape id the route belongs to.
        shape: ShapeId,
        /// Out-of-range packer index.
        route: usize,
        /// Number of configured packers.
        packers: usize,
    },

    /// The strategy's output does not reproduce the ground-truth
    /// non-empty bit count.
    #[error("non-empty bit counts do not match: ground truth {expected}, strategy output {actual}")]
    BitCountMismatch {
        /// Bit count recomputed from the snapshot.
        expected: u64,
        /// Bit count derived from the strategy's segments.
        actual: u64,
    },

    /// The strategy's output does not reproduce a ground-truth shape
    /// occurrence count: a row was dropped, duplicated, or reinterpreted.
    #[error("occurrence counts for {shape} do not match: ground truth {expected}, strategy output {actual}")]
    ShapeCountMismatch {
        /// Offending shape id.
        shape: ShapeId,
        /// Occurrences recomputed from the snapshot.
        expected: u64,
        /// Occurrences counted in the strategy's segments.
        actual: u64,
    },

    /// Snapshot model error.
    #[error(transparent)]
    Model(#[from] colsim_model::ModelError),
}

impl SimError {
    /// Checks whether this is a schema violation (a bug in the
    /// strategy's layout logic).
    #[must_use]
    pub fn is_schema_violation(&self) -> bool {
        matches!(
            self,
            Self::ColumnOverflow { .. }
                | Self::FieldAlreadyPacked { .. }
                | Self::RouteOutOfRange { .. }
        )
    }

    /// Checks whether this is a consistency violation (the strategy's
    /// replay did not preserve the row multiset).
    #[must_use]
    pub fn is_consistency_violation(&self) -> bool {
        matches!(
            self,
            Self::BitCountMismatch { .. } | Self::ShapeCountMismatch { .. }
        )
    }
}
