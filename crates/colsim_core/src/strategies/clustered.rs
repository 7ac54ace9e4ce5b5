//! Clustering strategy: group shapes that clear the same columns onto
//! shared segments, so those columns stay entirely null there and their
//! null vectors can be shared.

use std::collections::BTreeMap;

use colsim_model::{Field, ShapeId, ShapeTable};

use crate::harness::DEFAULT_SEGMENT_FILL_SIZE;
use crate::packer::{FieldPacker, MultiplexingPacker, RecordPacker};
use crate::stats::ShapeStats;
use crate::strategy::{
    FieldLayoutStrategy, RecordLayoutStrategy, RecordProcessor, StrategyFactory,
};

/// Routes each shape to a packer shared by every shape with the same
/// clear-column set under the current field assignment.
///
/// Distinct shapes often reduce to the same clear-column set once
/// projected through the column assignment; grouping them multiplies
/// the rows behind each shareable null vector.
#[derive(Debug)]
pub struct ClusteredRecordStrategy {
    mux: MultiplexingPacker,
}

impl ClusteredRecordStrategy {
    /// Builds the routing from the shapes' clear-column sets.
    #[must_use]
    pub fn new(shapes: &ShapeTable, fields: &[Field], fill_size: usize) -> Self {
        let clear_layouts = shapes.clear_column_layouts(fields);

        // First-seen group assignment in shape-id order keeps the
        // packer list deterministic.
        let mut groups: BTreeMap<Vec<u32>, usize> = BTreeMap::new();
        let mut routes = Vec::with_capacity(clear_layouts.len());
        for layout in &clear_layouts {
            let next = groups.len();
            let group = *groups.entry(layout.to_vec()).or_insert(next);
            routes.push(group);
        }

        let packers = (0..groups.len()).map(|_| RecordPacker::new(fill_size)).collect();
        let mux = MultiplexingPacker::new(packers, routes)
            .expect("routes index the packers built above");
        Self { mux }
    }
}

impl RecordProcessor for ClusteredRecordStrategy {
    fn process_record(&mut self, shape: ShapeId) {
        self.mux.process_record(shape);
    }
}

impl RecordLayoutStrategy for ClusteredRecordStrategy {
    fn flush(&mut self) {
        self.mux.flush();
    }

    fn into_segments(self: Box<Self>) -> Vec<Vec<ShapeId>> {
        self.mux.into_segments()
    }
}

/// Orders fields by how often the sampled rows populate them, most
/// frequent first, then eagerly bin-packs.
///
/// Rarely-populated fields end up sharing the high columns, which the
/// record pass can then keep entirely clear in most segments.
#[derive(Debug)]
pub struct FrequencyFieldStrategy {
    shapes: ShapeTable,
    fields: Vec<Field>,
    stats: ShapeStats,
}

impl FrequencyFieldStrategy {
    /// Creates the strategy over a snapshot's shapes and fields.
    #[must_use]
    pub fn new(shapes: &ShapeTable, fields: &[Field]) -> Self {
        Self {
            shapes: shapes.clone(),
            fields: fields.to_vec(),
            stats: ShapeStats::new(shapes.len()),
        }
    }
}

impl RecordProcessor for FrequencyFieldStrategy {
    fn process_record(&mut self, shape: ShapeId) {
        self.stats.process_record(shape);
    }
}

impl FieldLayoutStrategy for FrequencyFieldStrategy {
    fn into_fields(self: Box<Self>) -> Vec<Field> {
        let mut weight = vec![0u64; self.fields.len()];
        for entry in self.stats.field_stats(&self.shapes) {
            for bit in entry.used_fields.iter() {
                weight[bit as usize] += entry.records;
            }
        }

        let mut ordered = self.fields;
        // Stable: ties keep snapshot order.
        ordered.sort_by(|a, b| weight[b.index].cmp(&weight[a.index]));

        let mut packer = FieldPacker::new();
        for field in &ordered {
            packer
                .pack(field)
                .expect("snapshot fields have unique indices");
        }
        packer.into_fields()
    }
}

/// Frequency-ordered fields plus clear-column clustering of records.
#[derive(Debug)]
pub struct ClusteredFactory {
    fill_size: usize,
}

impl ClusteredFactory {
    /// Creates the factory with the given segment fill size.
    #[must_use]
    pub fn new(fill_size: usize) -> Self {
        Self { fill_size }
    }
}

impl Default for ClusteredFactory {
    fn default() -> Self {
        Self::new(DEFAULT_SEGMENT_FILL_SIZE)
    }
}

impl StrategyFactory for ClusteredFactory {
    fn name(&self) -> &str {
        "clustered"
    }

    fn field_strategy(
        &self,
        shapes: &ShapeTable,
        fields: &[Field],
    ) -> Option<Box<dyn FieldLayoutStrategy>> {
        Some(Box::new(FrequencyFieldStrategy::new(shapes, fields)))
    }

    fn record_strategy(
        &self,
        shapes: &ShapeTable,
        fields: &[Field],
    ) -> Box<dyn RecordLayoutStrategy> {
        Box::new(ClusteredRecordStrategy::new(shapes, fields, self.fill_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colsim_model::Bitmap;

    fn field(size: u32, column: usize, index: usize) -> Field {
        Field::new(format!("f{index}"), size, column, index).unwrap()
    }

    fn id(n: u32) -> ShapeId {
        ShapeId::new(n)
    }

    /// Shapes 1 and 2 clear the same columns; shape 3 differs.
    fn shapes() -> ShapeTable {
        ShapeTable::new(vec![
            Bitmap::new(),
            Bitmap::of(&[0]),
            Bitmap::of(&[1]),
            Bitmap::of(&[2]),
        ])
    }

    #[test]
    fn records_cluster_by_clear_columns() {
        // Fields 0 and 1 share column 0; field 2 is column 1.
        let fields = vec![field(8, 0, 0), field(8, 0, 1), field(16, 1, 2)];
        let mut strategy = Box::new(ClusteredRecordStrategy::new(&shapes(), &fields, 100));

        for n in [1, 3, 2, 3, 1] {
            strategy.process_record(id(n));
        }
        strategy.flush();

        let segments = strategy.into_segments();
        // Group 0: empty shape (all clear). Group 1: shapes 1 and 2
        // (column 1 clear). Group 2: shape 3 (column 0 clear).
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], vec![id(1), id(2), id(1)]);
        assert_eq!(segments[1], vec![id(3), id(3)]);
    }

    #[test]
    fn frequency_ordering_packs_hot_fields_first() {
        let fields = vec![field(8, 0, 0), field(8, 1, 1), field(8, 2, 2)];
        let mut strategy = Box::new(FrequencyFieldStrategy::new(&shapes(), &fields));

        // Field 2 (shape 3) observed most, then field 1 (shape 2).
        for n in [3, 3, 3, 2, 2, 1] {
            strategy.process_record(id(n));
        }

        let packed = strategy.into_fields();
        assert_eq!(
            packed.iter().map(|f| f.index).collect::<Vec<_>>(),
            vec![2, 1, 0]
        );
        // All three fit in one column (8 * 3 <= 32).
        assert!(packed.iter().all(|f| f.column == 0));
    }

    #[test]
    fn clustering_preserves_the_row_multiset() {
        let fields = vec![field(8, 0, 0), field(8, 0, 1), field(16, 1, 2)];
        let rows = [1u32, 2, 3, 1, 3, 2, 2, 0];
        let mut strategy = Box::new(ClusteredRecordStrategy::new(&shapes(), &fields, 3));
        for &n in &rows {
            strategy.process_record(id(n));
        }
        strategy.flush();

        let mut replayed: Vec<u32> = strategy
            .into_segments()
            .into_iter()
            .flatten()
            .map(ShapeId::as_u32)
            .collect();
        replayed.sort_unstable();
        let mut expected = rows.to_vec();
        expected.sort_unstable();
        assert_eq!(replayed, expected);
    }
}
