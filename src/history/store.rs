//! PostgreSQL store for estimate history.

use async_trait::async_trait;
use deadpool_postgres::{Config, Pool, Runtime};
use rust_decimal::Decimal;
use tokio_postgres::NoTls;
use uuid::Uuid;

use crate::building::Dimensions;
use crate::config::DatabaseConfig;
use crate::db::Database;
use crate::error::DatabaseError;
use crate::estimate::EstimateResult;
use crate::tables::TableOverrides;

mod embedded {
    refinery::embed_migrations!("migrations");
}

/// A persisted estimate run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EstimateRecord {
    pub id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub result: EstimateResult,
    pub dimensions: Dimensions,
}

/// Listing row for saved estimates.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EstimateSummary {
    pub id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub building_type: String,
    pub climate_zone: i16,
    pub total: Decimal,
    pub accuracy: Option<f64>,
}

/// Database store for estimate history.
pub struct Store {
    pool: Pool,
}

impl Store {
    /// Create a new store and connect to the database.
    pub async fn new(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let mut cfg = Config::new();
        cfg.url = Some(config.url().to_string());
        cfg.pool = Some(deadpool_postgres::PoolConfig {
            max_size: config.pool_size,
            ..Default::default()
        });

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| DatabaseError::Pool(e.to_string()))?;

        // Test connection
        let _ = pool.get().await?;

        Ok(Self { pool })
    }

    /// Run embedded schema migrations.
    pub async fn run_migrations(&self) -> Result<(), DatabaseError> {
        let mut conn = self.pool.get().await?;
        let client: &mut tokio_postgres::Client = &mut conn;
        embedded::migrations::runner()
            .run_async(client)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;
        tracing::info!("database migrations applied");
        Ok(())
    }

    async fn conn(&self) -> Result<deadpool_postgres::Object, DatabaseError> {
        Ok(self.pool.get().await?)
    }
}

#[async_trait]
impl Database for Store {
    async fn save_estimate(
        &self,
        result: &EstimateResult,
        dimensions: &Dimensions,
    ) -> Result<(), DatabaseError> {
        let conn = self.conn().await?;
        let payload = serde_json::to_value(result)?;
        let dims_payload = serde_json::to_value(dimensions)?;

        conn.execute(
            r#"
            INSERT INTO estimates (
                id, created_at, building_type, climate_zone, total, accuracy, result, dimensions
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
            &[
                &result.id,
                &result.created_at,
                &result.building_type.key(),
                &(result.climate_zone as i16),
                &result.total,
                &result.accuracy,
                &payload,
                &dims_payload,
            ],
        )
        .await?;

        Ok(())
    }

    async fn get_estimate(&self, id: Uuid) -> Result<Option<EstimateRecord>, DatabaseError> {
        let conn = self.conn().await?;
        let row = conn
            .query_opt(
                "SELECT id, created_at, result, dimensions FROM estimates WHERE id = $1",
                &[&id],
            )
            .await?;

        match row {
            Some(row) => {
                let result: serde_json::Value = row.get("result");
                let dimensions: serde_json::Value = row.get("dimensions");
                Ok(Some(EstimateRecord {
                    id: row.get("id"),
                    created_at: row.get("created_at"),
                    result: serde_json::from_value(result)?,
                    dimensions: serde_json::from_value(dimensions)?,
                }))
            }
            None => Ok(None),
        }
    }

    async fn list_estimates(&self, limit: usize) -> Result<Vec<EstimateSummary>, DatabaseError> {
        let conn = self.conn().await?;
        let rows = conn
            .query(
                r#"
                SELECT id, created_at, building_type, climate_zone, total, accuracy
                FROM estimates
                ORDER BY created_at DESC
                LIMIT $1
                "#,
                &[&(limit as i64)],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| EstimateSummary {
                id: row.get("id"),
                created_at: row.get("created_at"),
                building_type: row.get("building_type"),
                climate_zone: row.get("climate_zone"),
                total: row.get("total"),
                accuracy: row.get("accuracy"),
            })
            .collect())
    }

    async fn delete_estimate(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let conn = self.conn().await?;
        let deleted = conn
            .execute("DELETE FROM estimates WHERE id = $1", &[&id])
            .await?;
        Ok(deleted > 0)
    }

    async fn save_dimensions(&self, id: Uuid, dims: &Dimensions) -> Result<(), DatabaseError> {
        let conn = self.conn().await?;
        let payload = serde_json::to_value(dims)?;
        conn.execute(
            r#"
            INSERT INTO dimension_sets (id, payload) VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET payload = EXCLUDED.payload
            "#,
            &[&id, &payload],
        )
        .await?;
        Ok(())
    }

    async fn get_dimensions(&self, id: Uuid) -> Result<Option<Dimensions>, DatabaseError> {
        let conn = self.conn().await?;
        let row = conn
            .query_opt("SELECT payload FROM dimension_sets WHERE id = $1", &[&id])
            .await?;
        match row {
            Some(row) => {
                let payload: serde_json::Value = row.get("payload");
                Ok(Some(serde_json::from_value(payload)?))
            }
            None => Ok(None),
        }
    }

    async fn load_overrides(
        &self,
        profile: &str,
    ) -> Result<Option<TableOverrides>, DatabaseError> {
        let conn = self.conn().await?;
        let row = conn
            .query_opt(
                "SELECT payload FROM table_overrides WHERE profile = $1",
                &[&profile],
            )
            .await?;
        match row {
            Some(row) => {
                let payload: serde_json::Value = row.get("payload");
                Ok(Some(serde_json::from_value(payload)?))
            }
            None => Ok(None),
        }
    }

    async fn save_overrides(
        &self,
        profile: &str,
        overrides: &TableOverrides,
    ) -> Result<(), DatabaseError> {
        let conn = self.conn().await?;
        let payload = serde_json::to_value(overrides)?;
        conn.execute(
            r#"
            INSERT INTO table_overrides (profile, payload, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (profile) DO UPDATE SET payload = EXCLUDED.payload, updated_at = NOW()
            "#,
            &[&profile, &payload],
        )
        .await?;
        Ok(())
    }
}
