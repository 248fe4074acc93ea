//! Mediaslot shadow store
//!
//! Optional relational collaborator. Descriptors are mirrored here on the
//! write path, best-effort; no read path of the core ever consults this
//! store, so a failed shadow write degrades to a warning, never a request
//! failure.

use mediaslot_core::models::AssetDescriptor;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Write-only repository mirroring asset descriptors into Postgres.
#[derive(Clone)]
pub struct ShadowAssetRepository {
    pool: PgPool,
}

impl ShadowAssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and run migrations. Called at startup when `DATABASE_URL` is
    /// configured.
    pub async fn connect(database_url: &str) -> Result<Self, anyhow::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self::new(pool))
    }

    /// Mirror one descriptor. An existing row for the same id is replaced,
    /// matching upsert-by-slot semantics upstream.
    pub async fn record_descriptor(&self, descriptor: &AssetDescriptor) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO asset_shadow
                (id, entity_id, entity_type, company_id, stored_name, original_name,
                 mime_type, size_bytes, position, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                stored_name = EXCLUDED.stored_name,
                original_name = EXCLUDED.original_name,
                mime_type = EXCLUDED.mime_type,
                size_bytes = EXCLUDED.size_bytes,
                position = EXCLUDED.position,
                created_at = EXCLUDED.created_at
            "#,
        )
        .bind(descriptor.id)
        .bind(&descriptor.entity_id)
        .bind(&descriptor.entity_type)
        .bind(&descriptor.company_id)
        .bind(&descriptor.stored_name)
        .bind(&descriptor.original_name)
        .bind(&descriptor.mime_type)
        .bind(descriptor.size_bytes)
        .bind(descriptor.position.map(|p| p as i32))
        .bind(descriptor.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Mirror a whole upload batch; stops at the first failure, which the
    /// caller downgrades to a warning.
    pub async fn record_descriptors(
        &self,
        descriptors: &[AssetDescriptor],
    ) -> Result<(), sqlx::Error> {
        for descriptor in descriptors {
            self.record_descriptor(descriptor).await?;
        }
        Ok(())
    }
}
