//! AssetStore implementation for PgStorage.

use assetdb_core::{Asset, AssetStatus, NewAsset};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

use super::{i64_to_u64, row_location, vector_literal, PgStorage, ASSET_COLUMNS};
use crate::error::StorageError;
use crate::traits::AssetStore;

fn row_to_asset(row: &sqlx::postgres::PgRow) -> Result<Asset, StorageError> {
    let status_str: String = row.try_get("status")?;
    let status: AssetStatus = status_str.parse().unwrap_or_else(|_| {
        tracing::warn!(invalid_status = %status_str, "corrupt asset status in DB, defaulting to Active");
        AssetStatus::Active
    });
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;
    Ok(Asset {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        address: row.try_get("address")?,
        district: row.try_get("district")?,
        province: row.try_get("province")?,
        location_type: row.try_get("location_type")?,
        location: row_location(row)?,
        metadata: row.try_get("metadata")?,
        images: row.try_get("images")?,
        tags: row.try_get("tags")?,
        status,
        verified: row.try_get("verified")?,
        has_embedding: row.try_get("has_embedding")?,
        created_at,
        updated_at,
    })
}

#[async_trait]
impl AssetStore for PgStorage {
    async fn insert_asset(&self, asset: &NewAsset) -> Result<i32, StorageError> {
        let wkt = asset.location.map(|p| p.to_wkt());
        let embedding =
            if asset.embedding.is_empty() { None } else { Some(vector_literal(&asset.embedding)) };
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO assets
                 (name, description, address, district, province, location_type,
                  location, embedding, metadata, tags)
             VALUES ($1, $2, $3, $4, $5, $6,
                     ST_GeogFromText($7::text), $8::vector, $9, $10)
             RETURNING id",
        )
        .bind(&asset.name)
        .bind(&asset.description)
        .bind(&asset.address)
        .bind(&asset.district)
        .bind(&asset.province)
        .bind(&asset.location_type)
        .bind(wkt)
        .bind(embedding)
        .bind(&asset.metadata)
        .bind(&asset.tags)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn get_asset(&self, id: i32) -> Result<Option<Asset>, StorageError> {
        let row = sqlx::query(&format!("SELECT {ASSET_COLUMNS} FROM assets WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_asset).transpose()
    }

    async fn count_assets(&self) -> Result<u64, StorageError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM assets").fetch_one(&self.pool).await?;
        Ok(i64_to_u64(count))
    }

    async fn rebuild_vector_index(&self) -> Result<(), StorageError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM pg_indexes WHERE indexname = 'idx_assets_embedding')",
        )
        .fetch_one(&self.pool)
        .await?;
        if !exists {
            tracing::debug!("no ivfflat index to rebuild");
            return Ok(());
        }
        sqlx::query("REINDEX INDEX idx_assets_embedding").execute(&self.pool).await?;
        tracing::info!("rebuilt embedding index");
        Ok(())
    }
}
