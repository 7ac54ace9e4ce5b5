//! # ColSim Model
//!
//! Data model for captured layout snapshots.
//!
//! A snapshot is the immutable ground truth a simulation run replays:
//! field definitions, per-shape field-presence bitmaps, and the original
//! row-to-shape assignment grouped into segments. Strategies under
//! evaluation may reorder fields and redistribute rows, but the snapshot
//! itself is never mutated.
//!
//! This crate provides:
//! - [`ShapeId`]: identifier for a captured record pattern
//! - [`Field`]: a fixed-bit-width attribute slot with a storage column
//! - [`ShapeTable`]: the shape-id to presence-bitmap table
//! - [`DatasetLayout`], [`CompanyLayout`], [`Layout`]: the snapshot tree

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod field;
mod shape;
mod snapshot;
mod types;

pub use error::{ModelError, ModelResult};
pub use field::{column_count, Field, COLUMN_BITS};
pub use shape::ShapeTable;
pub use snapshot::{CompanyLayout, DatasetLayout, Layout};
pub use types::ShapeId;

pub use croaring::Bitmap;
