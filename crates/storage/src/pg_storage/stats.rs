//! StatsStore implementation for PgStorage.

use assetdb_core::{AssetStats, TypeCount};
use async_trait::async_trait;
use sqlx::Row;

use super::{i64_to_u64, PgStorage};
use crate::error::StorageError;
use crate::traits::StatsStore;

#[async_trait]
impl StatsStore for PgStorage {
    async fn get_stats(&self) -> Result<AssetStats, StorageError> {
        let total_assets: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM assets").fetch_one(&self.pool).await?;

        let rows = sqlx::query(
            "SELECT location_type, COUNT(*) AS count
               FROM assets
              GROUP BY location_type
              ORDER BY count DESC, location_type",
        )
        .fetch_all(&self.pool)
        .await?;
        let assets_by_type = rows
            .iter()
            .map(|row| -> Result<TypeCount, StorageError> {
                Ok(TypeCount {
                    location_type: row.try_get("location_type")?,
                    count: i64_to_u64(row.try_get("count")?),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let assets_with_images: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM assets
              WHERE CASE WHEN jsonb_typeof(images) = 'array'
                         THEN jsonb_array_length(images) > 0
                         ELSE FALSE END",
        )
        .fetch_one(&self.pool)
        .await?;

        let total_unique_tags: i64 =
            sqlx::query_scalar("SELECT COUNT(DISTINCT tag) FROM assets, unnest(tags) AS tag")
                .fetch_one(&self.pool)
                .await?;

        Ok(AssetStats {
            total_assets: i64_to_u64(total_assets),
            assets_by_type,
            assets_with_images: i64_to_u64(assets_with_images),
            total_unique_tags: i64_to_u64(total_unique_tags),
        })
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
