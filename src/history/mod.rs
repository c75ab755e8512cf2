//! Estimate history persistence.
//!
//! Stores estimate runs, dimension sets, and per-user pricing overrides in
//! PostgreSQL, keyed by generated UUID.

mod store;

pub use store::{EstimateRecord, EstimateSummary, Store};
