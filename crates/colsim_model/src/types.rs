//! Core type definitions for ColSim.

use std::fmt;

/// Identifier for a captured record shape.
///
/// A shape stands for one distinct pattern of which fields are present
/// in a record. Shape 0 is reserved and denotes an entirely empty row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeId(pub u32);

impl ShapeId {
    /// The reserved empty shape (no fields present).
    pub const EMPTY: Self = Self(0);

    /// Creates a new shape ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the ID as an index into shape-keyed tables.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Checks if this is the reserved empty shape.
    #[must_use]
    pub const fn is_empty_shape(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape:{}", self.0)
    }
}

impl From<u32> for ShapeId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}
