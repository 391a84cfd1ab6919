use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, Executor, Pool, Postgres, Row};

use crate::{
    entities::{IsochroneRecord, NewIsochrone},
    error::Error,
};

/// Append-only record store for computed isochrones.
#[async_trait]
pub trait IsochroneStore {
    async fn insert_isochrone(&self, isochrone: NewIsochrone) -> Result<i32, Error>;
    async fn list_isochrones(&self) -> Result<Vec<IsochroneRecord>, Error>;
}

pub type DynStore = Arc<dyn IsochroneStore + Send + Sync>;

#[derive(Debug)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub async fn connect(db_uri: &str, max_connections: u32) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(db_uri)
            .await?;

        Self::new(pool).await
    }

    /// Creates the schema before returning, so no caller can reach a missing
    /// table.
    #[tracing::instrument(name = "PgStore::new", skip_all)]
    pub async fn new(pool: Pool<Postgres>) -> Result<Self, Error> {
        pool.execute(
            "CREATE TABLE IF NOT EXISTS walkability_isochrones (
                id SERIAL PRIMARY KEY,
                latitude DOUBLE PRECISION NOT NULL,
                longitude DOUBLE PRECISION NOT NULL,
                walk_time INT4 NOT NULL,
                geojson TEXT NOT NULL
            )",
        )
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl IsochroneStore for PgStore {
    #[tracing::instrument(skip_all, fields(walk_time = isochrone.walk_time))]
    async fn insert_isochrone(&self, isochrone: NewIsochrone) -> Result<i32, Error> {
        let mut conn = self.pool.acquire().await?;

        let id: i32 = conn
            .fetch_one(
                sqlx::query(
                    "INSERT INTO walkability_isochrones (latitude, longitude, walk_time, geojson) VALUES ($1, $2, $3, $4) RETURNING id",
                )
                .bind(isochrone.origin.latitude)
                .bind(isochrone.origin.longitude)
                .bind(isochrone.walk_time)
                .bind(&isochrone.geojson),
            )
            .await?
            .try_get("id")?;

        Ok(id)
    }

    #[tracing::instrument(skip(self))]
    async fn list_isochrones(&self) -> Result<Vec<IsochroneRecord>, Error> {
        let mut conn = self.pool.acquire().await?;

        let records = sqlx::query_as::<_, IsochroneRecord>(
            "SELECT id, latitude, longitude, walk_time, geojson FROM walkability_isochrones",
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(records)
    }
}
