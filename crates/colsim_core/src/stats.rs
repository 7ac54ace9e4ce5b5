//! Single-pass shape frequency statistics for clustering heuristics.

use colsim_model::{Bitmap, ShapeId, ShapeTable};

use crate::strategy::RecordProcessor;

/// Field-presence statistics for one shape.
#[derive(Debug, Clone)]
pub struct FieldShapeStats {
    /// Shape this entry describes.
    pub shape: ShapeId,
    /// Fields present in the shape.
    pub used_fields: Bitmap,
    /// Number of records observed with this shape.
    pub records: u64,
}

/// Clear-column statistics for one shape.
///
/// Two distinct shapes can reduce to the same clear-column set once
/// projected through a field-to-column assignment; grouping such shapes
/// together increases the chance of shareable null vectors.
#[derive(Debug, Clone)]
pub struct ColumnShapeStats {
    /// Shape this entry describes.
    pub shape: ShapeId,
    /// Columns guaranteed to hold no value for this shape.
    pub clear_columns: Bitmap,
    /// Number of records observed with this shape.
    pub records: u64,
}

/// Accumulates per-shape frequency counts in one linear pass over a
/// (possibly sampled) shape sequence.
#[derive(Debug)]
pub struct ShapeStats {
    freq: Vec<u64>,
}

impl ShapeStats {
    /// Creates a collector for the given number of shapes.
    #[must_use]
    pub fn new(shape_count: usize) -> Self {
        Self {
            freq: vec![0; shape_count],
        }
    }

    /// Returns the observed record count for a shape.
    #[must_use]
    pub fn count(&self, shape: ShapeId) -> u64 {
        self.freq[shape.as_usize()]
    }

    /// Builds per-shape field-presence statistics, skipping the
    /// reserved empty shape.
    #[must_use]
    pub fn field_stats(&self, shapes: &ShapeTable) -> Vec<FieldShapeStats> {
        self.freq
            .iter()
            .enumerate()
            .skip(1)
            .map(|(shape, &records)| FieldShapeStats {
                shape: ShapeId::new(shape as u32),
                used_fields: shapes.get(ShapeId::new(shape as u32)).clone(),
                records,
            })
            .collect()
    }

    /// Builds per-shape clear-column statistics, skipping the reserved
    /// empty shape, sorted descending by record count. Ties keep
    /// ascending shape-id order, so the result is deterministic.
    ///
    /// `clear_layouts` is indexed by shape id, as produced by
    /// [`ShapeTable::clear_column_layouts`].
    #[must_use]
    pub fn column_stats(&self, clear_layouts: &[Bitmap]) -> Vec<ColumnShapeStats> {
        let mut stats: Vec<ColumnShapeStats> = self
            .freq
            .iter()
            .enumerate()
            .skip(1)
            .map(|(shape, &records)| ColumnShapeStats {
                shape: ShapeId::new(shape as u32),
                clear_columns: clear_layouts[shape].clone(),
                records,
            })
            .collect();
        // Stable sort: equal counts stay in shape-id order.
        stats.sort_by(|a, b| b.records.cmp(&a.records));
        stats
    }

    /// Returns how many records a clustering covers in total.
    #[must_use]
    pub fn total_records(clustering: &[ColumnShapeStats]) -> u64 {
        clustering.iter().map(|s| s.records).sum()
    }
}

impl RecordProcessor for ShapeStats {
    fn process_record(&mut self, shape: ShapeId) {
        self.freq[shape.as_usize()] += 1;
    }
}
