//! Error types for the snapshot data model.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while constructing or validating a layout snapshot.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A field declared a bit width outside the 1..=32 range.
    #[error("field '{name}' has invalid size {size} (must be 1..=32 bits)")]
    InvalidFieldSize {
        /// Name of the offending field.
        name: String,
        /// Declared size in bits.
        size: u32,
    },

    /// The shape table is missing the reserved empty shape at index 0.
    #[error("shape table is empty; shape 0 (the empty shape) is required")]
    MissingEmptyShape,

    /// Shape 0 must not mark any field as present.
    #[error("shape 0 is reserved for empty rows but has {bits} bit(s) set")]
    NonEmptyZeroShape {
        /// Number of bits set in shape 0.
        bits: u64,
    },

    /// A shape bitmap references a field index outside the field list.
    #[error("shape {shape} references field index {bit}, but only {fields} fields are defined")]
    InvalidFieldIndex {
        /// Offending shape id.
        shape: u32,
        /// Out-of-range bit index.
        bit: u32,
        /// Number of defined fields.
        fields: usize,
    },

    /// A segment row references a shape id outside the shape table.
    #[error("segment row references {shape}, but only {shapes} shapes are defined")]
    InvalidShapeId {
        /// Offending shape id.
        shape: u32,
        /// Number of defined shapes.
        shapes: usize,
    },
}

impl ModelError {
    /// Creates an invalid field size error.
    pub fn invalid_field_size(name: impl Into<String>, size: u32) -> Self {
        Self::InvalidFieldSize {
            name: name.into(),
            size,
        }
    }
}
