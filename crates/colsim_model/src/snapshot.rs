//! Captured layout snapshots: the immutable ground truth of a run.

use std::collections::BTreeMap;

use crate::error::{ModelError, ModelResult};
use crate::field::{Field, COLUMN_BITS};
use crate::shape::ShapeTable;
use crate::types::ShapeId;

/// The captured layout of a single dataset.
///
/// Read once per evaluation and never mutated. Strategies receive the
/// field list and shape table, replay the segment rows, and emit their
/// own segments; the snapshot stays the reference the scoring engine
/// cross-checks against.
#[derive(Debug, Clone)]
pub struct DatasetLayout {
    /// Field definitions. A field's position here is its original `index`.
    pub fields: Vec<Field>,
    /// Per-shape field-presence bitmaps, indexed by shape id.
    pub shapes: ShapeTable,
    /// Ordered segments of shape ids, one entry per physical row.
    pub segments: Vec<Vec<ShapeId>>,
}

impl DatasetLayout {
    /// Creates and validates a dataset snapshot.
    pub fn new(
        fields: Vec<Field>,
        shapes: ShapeTable,
        segments: Vec<Vec<ShapeId>>,
    ) -> ModelResult<Self> {
        let layout = Self {
            fields,
            shapes,
            segments,
        };
        layout.validate()?;
        Ok(layout)
    }

    /// Checks the snapshot's structural constraints.
    ///
    /// Shape 0 must be empty, every shape bit must name a defined field,
    /// every segment row must name a defined shape, and every field width
    /// must be 1..=32 bits.
    pub fn validate(&self) -> ModelResult<()> {
        for field in &self.fields {
            if field.size == 0 || field.size > COLUMN_BITS {
                return Err(ModelError::invalid_field_size(&field.name, field.size));
            }
        }

        let Some(empty) = self.shapes.bitmaps().first() else {
            return Err(ModelError::MissingEmptyShape);
        };
        if !empty.is_empty() {
            return Err(ModelError::NonEmptyZeroShape {
                bits: empty.cardinality(),
            });
        }

        for (shape, bitmap) in self.shapes.iter().enumerate() {
            for bit in bitmap.iter() {
                if bit as usize >= self.fields.len() {
                    return Err(ModelError::InvalidFieldIndex {
                        shape: shape as u32,
                        bit,
                        fields: self.fields.len(),
                    });
                }
            }
        }

        for segment in &self.segments {
            for &shape in segment {
                if shape.as_usize() >= self.shapes.len() {
                    return Err(ModelError::InvalidShapeId {
                        shape: shape.as_u32(),
                        shapes: self.shapes.len(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Returns the total number of captured rows across all segments.
    #[must_use]
    pub fn row_count(&self) -> u64 {
        self.segments.iter().map(|s| s.len() as u64).sum()
    }

    /// Checks whether the dataset has no rows. Empty datasets are
    /// skipped by the harness without invoking any strategy.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| s.is_empty())
    }

    /// Iterates over every captured row's shape id in original order.
    pub fn rows(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.segments.iter().flatten().copied()
    }

    /// Recomputes the total non-empty bit count directly from the
    /// ground truth: for every row, the widths of its present fields.
    #[must_use]
    pub fn used_bits(&self) -> u64 {
        self.rows()
            .map(|shape| {
                self.shapes
                    .get(shape)
                    .iter()
                    .map(|bit| u64::from(self.fields[bit as usize].size))
                    .sum::<u64>()
            })
            .sum()
    }

    /// Recomputes per-shape-id occurrence counts directly from the
    /// ground truth.
    #[must_use]
    pub fn shape_counts(&self) -> Vec<u64> {
        let mut counts = vec![0u64; self.shapes.len()];
        for shape in self.rows() {
            counts[shape.as_usize()] += 1;
        }
        counts
    }
}

/// All captured datasets of one company, keyed by dataset name.
///
/// `BTreeMap` keeps iteration deterministic across runs.
#[derive(Debug, Clone, Default)]
pub struct CompanyLayout {
    /// Mapping from dataset name to its snapshot.
    pub datasets: BTreeMap<String, DatasetLayout>,
}

/// A complete captured layout: every company, every dataset.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    /// Mapping from company name to its datasets.
    pub companies: BTreeMap<String, CompanyLayout>,
}
