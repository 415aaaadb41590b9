use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, Executor, Pool, Postgres, Row};

use crate::{error::Error, storage::KeyValueStore};

/// Key-value storage in a single Postgres table, for deployments that share
/// favorites between hosts.
#[derive(Debug)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    #[tracing::instrument(name = "PgStore::new", skip(db_uri))]
    pub async fn new(db_uri: &str, max_connections: u32) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(db_uri)
            .await?;

        pool.execute("CREATE TABLE IF NOT EXISTS storage (key VARCHAR PRIMARY KEY, value TEXT NOT NULL)")
            .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl KeyValueStore for PgStore {
    #[tracing::instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let mut conn = self.pool.acquire().await?;

        let maybe_result = conn
            .fetch_optional(sqlx::query("SELECT value FROM storage WHERE key = $1").bind(key))
            .await?;

        match maybe_result {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self, value))]
    async fn set(&self, key: &str, value: String) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        conn.execute(
            sqlx::query(
                "INSERT INTO storage (key, value) VALUES ($1, $2) ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
            )
            .bind(key)
            .bind(value),
        )
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn remove(&self, key: &str) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        conn.execute(sqlx::query("DELETE FROM storage WHERE key = $1").bind(key))
            .await?;

        Ok(())
    }
}
