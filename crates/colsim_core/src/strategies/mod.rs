//! Built-in reference strategies.
//!
//! These are the baselines third-party candidates compete against:
//! pass-through packing, size-ordered field packing, and clear-column
//! clustering.

mod clustered;
mod simple;

pub use clustered::{ClusteredFactory, ClusteredRecordStrategy, FrequencyFieldStrategy};
pub use simple::{
    DataSetFactory, DataSetRecordStrategy, SimpleFactory, SimpleRecordStrategy,
    SizeOrderedFactory, SizeOrderedFieldStrategy,
};
