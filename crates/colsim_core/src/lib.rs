//! # ColSim Core
//!
//! Simulation and scoring engine for columnar record-layout strategies.
//!
//! The engine replays a captured [`DatasetLayout`](colsim_model::DatasetLayout)
//! through a pluggable strategy and scores the layout it produces, so
//! competing strategies can be ranked offline without touching the live
//! storage engine.
//!
//! An evaluation has two phases per dataset:
//! 1. An optional field-layout strategy sees a deterministically sampled
//!    subset of the shape sequence and may return a revised
//!    field-to-column assignment.
//! 2. The record-layout strategy sees the full sequence, packs rows into
//!    segments, and is flushed; the scoring engine then recomputes
//!    storage cost and cross-checks the result against the ground truth.
//!
//! This crate provides:
//! - [`Segment`]/[`DataSet`]: the growable, capacity-capped segment store
//! - [`FieldPacker`]/[`RecordPacker`]/[`MultiplexingPacker`]: packing primitives
//! - [`StrategyFactory`] and friends: the strategy contract
//! - [`ShapeStats`]: single-pass shape frequency statistics
//! - [`analyze`]/[`Analysis`]: the scoring engine
//! - [`evaluate_dataset`]/[`evaluate_layout`]: the two-phase harness

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod harness;
mod packer;
mod registry;
mod score;
mod segment;
mod stats;
pub mod strategies;
mod strategy;
mod util;

pub use error::{SimError, SimResult};
pub use harness::{
    evaluate_dataset, evaluate_layout, replay, total_used_bytes, Config, DatasetReport,
    DEFAULT_SAMPLE_RATE, DEFAULT_SEGMENT_FILL_SIZE,
};
pub use packer::{FieldPacker, MultiplexingPacker, RecordPacker};
pub use registry::StrategyRegistry;
pub use score::{analyze, Analysis};
pub use segment::{DataSet, Segment, MAX_SEGMENT_SIZE};
pub use stats::{ColumnShapeStats, FieldShapeStats, ShapeStats};
pub use strategy::{
    FieldLayoutStrategy, RecordLayoutStrategy, RecordProcessor, StrategyFactory,
};
pub use util::{to_si, to_si_bytes};
