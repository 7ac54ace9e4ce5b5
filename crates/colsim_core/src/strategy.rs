//! The strategy contract: the polymorphic surface candidate layout
//! strategies implement.
//!
//! A strategy is composed of up to three parts:
//! - an optional [`FieldLayoutStrategy`] that sees a *sampled* subset of
//!   the shape sequence and may return a revised field-to-column
//!   assignment,
//! - a mandatory [`RecordLayoutStrategy`] that sees the *full* sequence
//!   and packs rows into segments,
//! - a [`StrategyFactory`] that creates both for a run on each dataset.
//!
//! Both simulators are constructed from the same ground-truth
//! `(shape table, field list)` pair. Terminal queries consume the
//! strategy (`self: Box<Self>`), so a strategy's output cannot change
//! after it has been collected.

use colsim_model::{Field, ShapeId, ShapeTable};

/// Anything that consumes replayed rows one shape id at a time.
pub trait RecordProcessor {
    /// Processes a single replayed row.
    fn process_record(&mut self, shape: ShapeId);
}

/// A record-layout strategy: packs the full, unsampled shape sequence
/// into segments.
///
/// Lifecycle: constructed, then any number of `process_record` calls
/// interleaved with `flush` calls, then exactly one final `flush`, then
/// the terminal `into_segments`. Each flush is a publish point: every
/// row processed so far must be visible in the produced segments.
pub trait RecordLayoutStrategy: RecordProcessor {
    /// Publishes everything processed so far.
    fn flush(&mut self);

    /// Terminal query: consumes the strategy into its produced segments.
    fn into_segments(self: Box<Self>) -> Vec<Vec<ShapeId>>;
}

/// A field-layout strategy: trains on a sampled subset of the shape
/// sequence, then returns a revised field list.
///
/// The returned list may reorder fields and reassign columns, but must
/// preserve every original field `index`.
pub trait FieldLayoutStrategy: RecordProcessor {
    /// Terminal query: consumes the strategy into its field list.
    fn into_fields(self: Box<Self>) -> Vec<Field>;
}

/// Creates the simulators for one evaluation run and names the strategy
/// for reporting.
pub trait StrategyFactory {
    /// The strategy's display name.
    fn name(&self) -> &str;

    /// Creates the optional field-layout simulator. Returning `None`
    /// keeps the snapshot's original field-to-column assignment.
    fn field_strategy(
        &self,
        shapes: &ShapeTable,
        fields: &[Field],
    ) -> Option<Box<dyn FieldLayoutStrategy>>;

    /// Creates the record-layout simulator. When [`Self::field_strategy`]
    /// returned a simulator, `fields` is the field list it produced.
    fn record_strategy(
        &self,
        shapes: &ShapeTable,
        fields: &[Field],
    ) -> Box<dyn RecordLayoutStrategy>;
}
