//! PostgreSQL schema migrations for the `assets` table.
//!
//! Every statement is idempotent, so this runs on each start-up.

use anyhow::Result;
use assetdb_core::{AssetStatus, EMBEDDING_DIMENSION, IMAGE_EMBEDDING_DIMENSION};
use sqlx::PgPool;

/// Run all PostgreSQL migrations.
pub async fn run_pg_migrations(pool: &PgPool) -> Result<()> {
    sqlx::query("CREATE EXTENSION IF NOT EXISTS postgis").execute(pool).await?;
    sqlx::query("CREATE EXTENSION IF NOT EXISTS vector").execute(pool).await?;

    let allowed_status = AssetStatus::ALL_VARIANTS
        .iter()
        .map(|s| format!("'{}'", s.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS assets (
            id SERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            address TEXT,
            district TEXT,
            province TEXT,
            location_type TEXT NOT NULL DEFAULT 'general',
            location GEOGRAPHY(POINT, 4326),
            embedding vector({EMBEDDING_DIMENSION}),
            image_embeddings vector({IMAGE_EMBEDDING_DIMENSION}),
            metadata JSONB NOT NULL DEFAULT '{{}}',
            images JSONB NOT NULL DEFAULT '[]',
            tags TEXT[] NOT NULL DEFAULT '{{}}',
            search_vector tsvector,
            status TEXT NOT NULL DEFAULT 'active'
                CONSTRAINT assets_status_check CHECK (status IN ({allowed_status})),
            verified BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#
    ))
    .execute(pool)
    .await?;

    // updated_at: bumped on every UPDATE, never written by the application
    sqlx::query(
        r#"
        CREATE OR REPLACE FUNCTION assets_touch_updated_at() RETURNS TRIGGER AS $$
        BEGIN
            NEW.updated_at = NOW();
            RETURN NEW;
        END;
        $$ LANGUAGE plpgsql
        "#,
    )
    .execute(pool)
    .await?;

    replace_trigger(
        pool,
        "trg_assets_updated_at",
        "BEFORE UPDATE ON assets FOR EACH ROW EXECUTE FUNCTION assets_touch_updated_at()",
    )
    .await?;

    // search_vector: 'simple' config, Thai has no stemmer
    sqlx::query(
        r#"
        CREATE OR REPLACE FUNCTION assets_refresh_search_vector() RETURNS TRIGGER AS $$
        BEGIN
            NEW.search_vector :=
                setweight(to_tsvector('simple', COALESCE(NEW.name, '')), 'A') ||
                setweight(to_tsvector('simple', COALESCE(NEW.district, '')), 'B') ||
                setweight(to_tsvector('simple', COALESCE(NEW.province, '')), 'B') ||
                setweight(to_tsvector('simple', COALESCE(array_to_string(NEW.tags, ' '), '')), 'C');
            RETURN NEW;
        END;
        $$ LANGUAGE plpgsql
        "#,
    )
    .execute(pool)
    .await?;

    replace_trigger(
        pool,
        "trg_assets_search_vector",
        "BEFORE INSERT OR UPDATE ON assets FOR EACH ROW EXECUTE FUNCTION assets_refresh_search_vector()",
    )
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_assets_location ON assets USING GIST (location)")
        .execute(pool)
        .await?;

    if let Err(e) = sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_assets_embedding ON assets
         USING ivfflat (embedding vector_cosine_ops) WITH (lists = 100)",
    )
    .execute(pool)
    .await
    {
        tracing::warn!(error = %e, "could not create ivfflat index, similarity search will scan");
    }

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_assets_tags ON assets USING GIN (tags)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_assets_images ON assets USING GIN (images)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_assets_search_vector ON assets USING GIN (search_vector)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_assets_type_district ON assets (location_type, district)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_assets_status_type ON assets (status, location_type)",
    )
    .execute(pool)
    .await?;

    tracing::info!("PostgreSQL migrations completed");
    Ok(())
}

/// Drops and recreates a trigger on `assets` in one transaction. The DROP
/// locks the table until commit, so concurrent writers never see it missing.
async fn replace_trigger(pool: &PgPool, name: &str, definition: &str) -> Result<()> {
    let mut tx = pool.begin().await?;
    sqlx::query(&format!("DROP TRIGGER IF EXISTS {name} ON assets")).execute(&mut *tx).await?;
    sqlx::query(&format!("CREATE TRIGGER {name} {definition}")).execute(&mut *tx).await?;
    tx.commit().await?;
    Ok(())
}
