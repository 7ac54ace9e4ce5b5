//! # ColSim Testkit
//!
//! Test utilities for ColSim.
//!
//! This crate provides:
//! - Snapshot fixtures and builders
//! - Property-based test generators using proptest

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

pub use fixtures::*;
pub use generators::*;
