//! SearchStore implementation for PgStorage.

use assetdb_core::{AssetMatch, GeoPoint, NearbyAsset};
use async_trait::async_trait;
use sqlx::Row;

use super::{build_tsquery, row_to_summary, usize_to_i64, vector_literal, PgStorage, SUMMARY_COLUMNS};
use crate::error::StorageError;
use crate::traits::SearchStore;

#[async_trait]
impl SearchStore for PgStorage {
    async fn semantic_search(
        &self,
        query_vec: &[f32],
        limit: usize,
    ) -> Result<Vec<AssetMatch>, StorageError> {
        if query_vec.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let vec_str = vector_literal(query_vec);
        let rows = sqlx::query(&format!(
            "SELECT {SUMMARY_COLUMNS},
                    1.0 - (embedding <=> $1::vector) AS score
               FROM assets
              WHERE embedding IS NOT NULL AND status = 'active'
              ORDER BY embedding <=> $1::vector
              LIMIT $2"
        ))
        .bind(&vec_str)
        .bind(usize_to_i64(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<AssetMatch, StorageError> {
                Ok(AssetMatch { asset: row_to_summary(row)?, score: row.try_get("score")? })
            })
            .collect()
    }

    async fn text_search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<AssetMatch>, StorageError> {
        let tsquery = build_tsquery(query);
        if tsquery.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(&format!(
            "SELECT {SUMMARY_COLUMNS},
                    ts_rank(search_vector, to_tsquery('simple', $1))::float8 AS score
               FROM assets
              WHERE search_vector @@ to_tsquery('simple', $1) AND status = 'active'
              ORDER BY score DESC, id
              LIMIT $2"
        ))
        .bind(&tsquery)
        .bind(usize_to_i64(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<AssetMatch, StorageError> {
                Ok(AssetMatch { asset: row_to_summary(row)?, score: row.try_get("score")? })
            })
            .collect()
    }

    async fn nearby(
        &self,
        center: GeoPoint,
        radius_m: f64,
        limit: usize,
    ) -> Result<Vec<NearbyAsset>, StorageError> {
        if limit == 0 || radius_m.is_nan() || radius_m <= 0.0 {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(&format!(
            "SELECT {SUMMARY_COLUMNS},
                    ST_Distance(location, ST_SetSRID(ST_MakePoint($2, $1), 4326)::geography)
                        AS distance_m
               FROM assets
              WHERE location IS NOT NULL
                AND status = 'active'
                AND ST_DWithin(location, ST_SetSRID(ST_MakePoint($2, $1), 4326)::geography, $3)
              ORDER BY distance_m
              LIMIT $4"
        ))
        .bind(center.latitude())
        .bind(center.longitude())
        .bind(radius_m)
        .bind(usize_to_i64(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<NearbyAsset, StorageError> {
                Ok(NearbyAsset { asset: row_to_summary(row)?, distance_m: row.try_get("distance_m")? })
            })
            .collect()
    }
}
