//! Persistence abstraction layer.
//!
//! CRUD by generated ID, nothing more. Estimate results are immutable
//! records; corrections save a new result under a new ID.

use async_trait::async_trait;
use uuid::Uuid;

use crate::building::Dimensions;
use crate::error::DatabaseError;
use crate::estimate::EstimateResult;
use crate::history::{EstimateRecord, EstimateSummary};
use crate::tables::TableOverrides;

/// Database abstraction layer.
#[async_trait]
pub trait Database: Send + Sync {
    // --- Estimates ---

    /// Persist an estimate result with the dimensions it was run against.
    async fn save_estimate(
        &self,
        result: &EstimateResult,
        dimensions: &Dimensions,
    ) -> Result<(), DatabaseError>;

    async fn get_estimate(&self, id: Uuid) -> Result<Option<EstimateRecord>, DatabaseError>;

    /// Most recent estimates first.
    async fn list_estimates(&self, limit: usize) -> Result<Vec<EstimateSummary>, DatabaseError>;

    /// Returns whether a record was deleted.
    async fn delete_estimate(&self, id: Uuid) -> Result<bool, DatabaseError>;

    // --- Dimension sets ---

    async fn save_dimensions(&self, id: Uuid, dims: &Dimensions) -> Result<(), DatabaseError>;

    async fn get_dimensions(&self, id: Uuid) -> Result<Option<Dimensions>, DatabaseError>;

    // --- Table overrides ---

    /// Stored pricing overrides for a user profile.
    async fn load_overrides(&self, profile: &str) -> Result<Option<TableOverrides>, DatabaseError>;

    async fn save_overrides(
        &self,
        profile: &str,
        overrides: &TableOverrides,
    ) -> Result<(), DatabaseError>;
}
