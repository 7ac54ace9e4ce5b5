//! Baseline strategies: pass-through record packing and size-ordered
//! field packing.

use colsim_model::{Field, ShapeId, ShapeTable};

use crate::harness::DEFAULT_SEGMENT_FILL_SIZE;
use crate::packer::{FieldPacker, RecordPacker};
use crate::segment::DataSet;
use crate::strategy::{
    FieldLayoutStrategy, RecordLayoutStrategy, RecordProcessor, StrategyFactory,
};

/// Packs records into segments in arrival order, ending the current
/// segment on any flush.
#[derive(Debug)]
pub struct SimpleRecordStrategy {
    packer: RecordPacker,
}

impl SimpleRecordStrategy {
    /// Creates a strategy producing segments of up to `fill_size` rows.
    #[must_use]
    pub fn new(fill_size: usize) -> Self {
        Self {
            packer: RecordPacker::new(fill_size),
        }
    }
}

impl RecordProcessor for SimpleRecordStrategy {
    fn process_record(&mut self, shape: ShapeId) {
        self.packer.process_record(shape);
    }
}

impl RecordLayoutStrategy for SimpleRecordStrategy {
    fn flush(&mut self) {
        self.packer.flush();
    }

    fn into_segments(self: Box<Self>) -> Vec<Vec<ShapeId>> {
        self.packer.into_segments()
    }
}

/// Packs records through the segment store instead of a fixed-fill
/// packer: each row lands in the last open segment, rolling over at the
/// hard segment cap.
#[derive(Debug, Default)]
pub struct DataSetRecordStrategy {
    data_set: DataSet,
}

impl DataSetRecordStrategy {
    /// Creates an empty strategy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordProcessor for DataSetRecordStrategy {
    fn process_record(&mut self, shape: ShapeId) {
        self.data_set.add_to_last(shape);
    }
}

impl RecordLayoutStrategy for DataSetRecordStrategy {
    fn flush(&mut self) {
        // Segments are published as they are written; nothing is buffered.
    }

    fn into_segments(self: Box<Self>) -> Vec<Vec<ShapeId>> {
        self.data_set.into_segments()
    }
}

/// Sorts fields ascending by size, then eagerly bin-packs them.
///
/// Ignores the training records entirely: the packing depends only on
/// the field widths.
#[derive(Debug)]
pub struct SizeOrderedFieldStrategy {
    fields: Vec<Field>,
}

impl SizeOrderedFieldStrategy {
    /// Creates the strategy over a snapshot's field list.
    #[must_use]
    pub fn new(fields: &[Field]) -> Self {
        Self {
            fields: fields.to_vec(),
        }
    }
}

impl RecordProcessor for SizeOrderedFieldStrategy {
    fn process_record(&mut self, _shape: ShapeId) {}
}

impl FieldLayoutStrategy for SizeOrderedFieldStrategy {
    fn into_fields(self: Box<Self>) -> Vec<Field> {
        let mut sorted = self.fields;
        sorted.sort_by_key(|f| f.size);

        let mut packer = FieldPacker::new();
        for field in &sorted {
            packer
                .pack(field)
                .expect("snapshot fields have unique indices");
        }
        packer.into_fields()
    }
}

/// Pass-through baseline: original field assignment, arrival-order
/// segment packing.
#[derive(Debug)]
pub struct SimpleFactory {
    fill_size: usize,
}

impl SimpleFactory {
    /// Creates the factory with the given segment fill size.
    #[must_use]
    pub fn new(fill_size: usize) -> Self {
        Self { fill_size }
    }
}

impl Default for SimpleFactory {
    fn default() -> Self {
        Self::new(DEFAULT_SEGMENT_FILL_SIZE)
    }
}

impl StrategyFactory for SimpleFactory {
    fn name(&self) -> &str {
        "simple"
    }

    fn field_strategy(
        &self,
        _shapes: &ShapeTable,
        _fields: &[Field],
    ) -> Option<Box<dyn FieldLayoutStrategy>> {
        None
    }

    fn record_strategy(
        &self,
        _shapes: &ShapeTable,
        _fields: &[Field],
    ) -> Box<dyn RecordLayoutStrategy> {
        Box::new(SimpleRecordStrategy::new(self.fill_size))
    }
}

/// Segment-store baseline: original field assignment, rows placed
/// through [`DataSet`].
#[derive(Debug, Default)]
pub struct DataSetFactory;

impl StrategyFactory for DataSetFactory {
    fn name(&self) -> &str {
        "dataset"
    }

    fn field_strategy(
        &self,
        _shapes: &ShapeTable,
        _fields: &[Field],
    ) -> Option<Box<dyn FieldLayoutStrategy>> {
        None
    }

    fn record_strategy(
        &self,
        _shapes: &ShapeTable,
        _fields: &[Field],
    ) -> Box<dyn RecordLayoutStrategy> {
        Box::new(DataSetRecordStrategy::new())
    }
}

/// Size-ordered field packing on top of arrival-order segment packing.
#[derive(Debug)]
pub struct SizeOrderedFactory {
    fill_size: usize,
}

impl SizeOrderedFactory {
    /// Creates the factory with the given segment fill size.
    #[must_use]
    pub fn new(fill_size: usize) -> Self {
        Self { fill_size }
    }
}

impl Default for SizeOrderedFactory {
    fn default() -> Self {
        Self::new(DEFAULT_SEGMENT_FILL_SIZE)
    }
}

impl StrategyFactory for SizeOrderedFactory {
    fn name(&self) -> &str {
        "size-ordered"
    }

    fn field_strategy(
        &self,
        _shapes: &ShapeTable,
        fields: &[Field],
    ) -> Option<Box<dyn FieldLayoutStrategy>> {
        Some(Box::new(SizeOrderedFieldStrategy::new(fields)))
    }

    fn record_strategy(
        &self,
        _shapes: &ShapeTable,
        _fields: &[Field],
    ) -> Box<dyn RecordLayoutStrategy> {
        Box::new(SimpleRecordStrategy::new(self.fill_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(size: u32, index: usize) -> Field {
        Field::new(format!("f{index}"), size, index, index).unwrap()
    }

    #[test]
    fn simple_strategy_packs_in_arrival_order() {
        let mut strategy = Box::new(SimpleRecordStrategy::new(2));
        for id in [3u32, 1, 2] {
            strategy.process_record(ShapeId::new(id));
        }
        strategy.flush();
        assert_eq!(
            strategy.into_segments(),
            vec![
                vec![ShapeId::new(3), ShapeId::new(1)],
                vec![ShapeId::new(2)],
            ]
        );
    }

    #[test]
    fn size_ordered_packs_small_fields_first() {
        let fields = vec![field(30, 0), field(2, 1), field(30, 2)];
        let strategy = Box::new(SizeOrderedFieldStrategy::new(&fields));
        let packed = strategy.into_fields();

        // Sorted: f1(2), f0(30), f2(30). Columns: 0 (2+30=32), then 1.
        assert_eq!(
            packed.iter().map(|f| f.index).collect::<Vec<_>>(),
            vec![1, 0, 2]
        );
        assert_eq!(
            packed.iter().map(|f| f.column).collect::<Vec<_>>(),
            vec![0, 0, 1]
        );
    }

    #[test]
    fn size_ordered_sort_is_stable() {
        let fields = vec![field(8, 0), field(8, 1), field(8, 2)];
        let packed = Box::new(SizeOrderedFieldStrategy::new(&fields)).into_fields();
        assert_eq!(
            packed.iter().map(|f| f.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn dataset_strategy_publishes_without_flush() {
        let mut strategy = Box::new(DataSetRecordStrategy::new());
        strategy.process_record(ShapeId::new(1));
        strategy.flush();
        strategy.process_record(ShapeId::new(2));
        strategy.flush();
        // One rolling segment; flush is a publish point, not a boundary.
        assert_eq!(
            strategy.into_segments(),
            vec![vec![ShapeId::new(1), ShapeId::new(2)]]
        );
    }
}
