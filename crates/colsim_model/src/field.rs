//! Field definitions.

use crate::error::{ModelError, ModelResult};

/// Number of bits a single storage column can hold.
pub const COLUMN_BITS: u32 = 32;

/// A named, fixed-bit-width attribute slot with an assigned storage column.
///
/// `index` is the field's immutable identity: its original bit position in
/// the snapshot's shape bitmaps. Strategies may move a field to a different
/// column and may reorder the field list, but a field's `index` never
/// changes, so every emitted field is traceable back to the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name, used for reporting only.
    pub name: String,
    /// Width in bits, 1..=32.
    pub size: u32,
    /// Assigned storage column. The only mutable aspect of a field's layout.
    pub column: usize,
    /// Original bit position in the snapshot's shape bitmaps. Never reassigned.
    pub index: usize,
}

impl Field {
    /// Creates a new field, rejecting bit widths outside 1..=32.
    pub fn new(
        name: impl Into<String>,
        size: u32,
        column: usize,
        index: usize,
    ) -> ModelResult<Self> {
        let name = name.into();
        if size == 0 || size > COLUMN_BITS {
            return Err(ModelError::invalid_field_size(name, size));
        }
        Ok(Self {
            name,
            size,
            column,
            index,
        })
    }

    /// Returns a copy of this field placed in a different column.
    ///
    /// The field's `index` identity is preserved.
    #[must_use]
    pub fn with_column(&self, column: usize) -> Self {
        Self {
            name: self.name.clone(),
            size: self.size,
            column,
            index: self.index,
        }
    }
}

/// Returns the number of columns used by a field arrangement.
///
/// This is the maximum assigned column plus one; an arrangement whose
/// highest column is 0 still occupies one column. Empty field lists use
/// zero columns.
#[must_use]
pub fn column_count(fields: &[Field]) -> usize {
    fields
        .iter()
        .map(|f| f.column + 1)
        .max()
        .unwrap_or_default()
}
