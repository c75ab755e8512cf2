//! Error types shared across the estimator.
//!
//! Error policy: only whole-input validation (`EstimateError`) aborts an
//! estimate run. Failures scoped to one trade or one material are recovered
//! and surfaced as annotations on the result instead.

use thiserror::Error;
use uuid::Uuid;

/// Errors that abort an estimate run entirely.
#[derive(Debug, Error)]
pub enum EstimateError {
    /// Non-positive or missing numeric input, rejected before any calculation.
    #[error("invalid dimension {field}: {value} (must be > 0)")]
    InvalidDimension { field: &'static str, value: f64 },

    /// Story count must be at least 1.
    #[error("invalid story count: {0}")]
    InvalidStories(u32),

    /// No code requirements exist for the selected climate zone.
    #[error("unknown climate zone: {zone} (expected 1-8)")]
    UnknownClimateZone { zone: u8 },

    /// The accuracy scorer has nothing to score.
    #[error("insufficient data: no photo confidence and no measured dimensions")]
    InsufficientData,
}

/// Failure of a single trade within an otherwise successful run.
///
/// Recovered by the engine: the trade is flagged unavailable in the result
/// and the remaining trades still compute.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TradeFailure {
    /// A feature required by this trade was not detected and cannot be
    /// derived from the entered dimensions.
    #[error("missing feature: {feature}")]
    MissingFeature { feature: &'static str },
}

/// Reference table errors.
#[derive(Debug, Error)]
pub enum TableError {
    /// A referenced material has no price entry. Recovered per line item
    /// with fallback pricing.
    #[error("no price entry for material: {key}")]
    UnknownMaterial { key: String },

    /// No labor rate for a trade. Recovered the same way.
    #[error("no labor rate for trade: {trade}")]
    UnknownTrade { trade: String },

    /// No requirements row for a climate zone.
    #[error("no code requirements for climate zone {zone}")]
    UnknownZone { zone: u8 },

    /// Built-in or override table failed to parse. Startup failure.
    #[error("reference table parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors from the external vision collaborator.
///
/// All of these degrade to a zero-confidence [`crate::building::BuildingFeatures`]
/// downstream rather than aborting estimation.
#[derive(Debug, Error)]
pub enum VisionError {
    /// Network failure or timeout talking to the vision API.
    #[error("analysis unavailable: {reason}")]
    Unavailable { reason: String },

    /// Response could not be parsed into the expected feature schema.
    #[error("analysis response malformed: {reason}")]
    Malformed { reason: String },

    /// API key missing or rejected.
    #[error("vision API authentication failed")]
    Auth,

    /// A photo could not be read from disk.
    #[error("unreadable photo {path}: {reason}")]
    Photo { path: String, reason: String },
}

/// Persistence layer errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Pool could not be created.
    #[error("connection pool error: {0}")]
    Pool(String),

    /// Pool had no healthy connection to hand out.
    #[error("connection unavailable: {0}")]
    Connection(#[from] deadpool_postgres::PoolError),

    /// Query execution failed.
    #[error("query failed: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Stored payload could not be decoded.
    #[error("stored payload invalid: {0}")]
    Payload(#[from] serde_json::Error),

    /// No record with the given ID.
    #[error("record not found: {id}")]
    NotFound { id: Uuid },

    /// Schema migration failed.
    #[error("migration failed: {0}")]
    Migration(String),
}

/// Settings file errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Unknown settings path in get/set/reset.
    #[error("unknown setting: {path}")]
    UnknownPath { path: String },

    /// Value could not be parsed for the target setting.
    #[error("invalid value for {path}: {value}")]
    InvalidValue { path: String, value: String },

    /// Settings file could not be read or written.
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid JSON.
    #[error("settings parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
