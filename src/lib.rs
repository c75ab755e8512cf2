//! Construction material takeoff and cost estimation.
//!
//! Turns building photos, user-entered dimensions, and building-code tables
//! into an itemized material and labor estimate with an accuracy score.
//! Estimate generation is a pure, synchronous, request-scoped computation;
//! the only async boundaries are the external vision API and the optional
//! PostgreSQL history store.

pub mod building;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod estimate;
pub mod history;
pub mod settings;
pub mod tables;
pub mod takeoff;
pub mod vision;

pub use building::{BuildingFeatures, Dimensions};
pub use estimate::{EstimateEngine, EstimateResult};
pub use tables::ReferenceTables;
