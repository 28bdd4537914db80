//! Grouping and aggregation over rental records.
//!
//! Pure functions over record slices: totals, rounded means, per-hour
//! profiles, season totals and weather splits. [`crate::dataset`] wires
//! them to a filtered view.

pub mod aggregate;
pub mod types;
pub mod utility;
