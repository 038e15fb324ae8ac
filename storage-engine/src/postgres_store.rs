//! PostgreSQL adapter for the greetings table and the rate reference table.

use async_trait::async_trait;
use bootcamp::domain::RateRecord;
use bootcamp::ports::{GreetingStore, RateTable};
use shared::{Error, Result};
use sqlx_core::pool::PoolOptions;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use sqlx_core::query_scalar::query_scalar;
use sqlx_postgres::{PgPool, Postgres};
use std::time::Duration;
use tracing::{debug, info, instrument};

const CREATE_GREETINGS: &str = r#"
    CREATE TABLE IF NOT EXISTS greetings (
        id BIGSERIAL PRIMARY KEY,
        token VARCHAR(100) NOT NULL,
        text TEXT NOT NULL
    )
"#;

// `rate` is a decimal; callers only ever see it multiplied by 100.
const BEST_RATE: &str = r#"
    SELECT id::BIGINT, prefix, ROUND(rate * 100)::BIGINT AS scaled_rate, trunk, len::INTEGER
    FROM rates
    WHERE starts_with($1, prefix)
    ORDER BY len DESC, rate ASC
    LIMIT 1
"#;

type RateRow = (i64, String, i64, Option<String>, i32);

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Builds the pool without dialing the database; connections open on first use.
    pub fn connect_lazy(url: &str, acquire_timeout: Duration) -> Result<Self> {
        info!(url = %mask_password(url), "Creating PostgreSQL connection pool");

        let pool = PoolOptions::<Postgres>::new()
            .max_connections(10)
            .acquire_timeout(acquire_timeout)
            .connect_lazy(url)
            .map_err(|e| Error::Internal(format!("Invalid database url: {}", e)))?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn store_error(e: sqlx_core::error::Error) -> Error {
    Error::StoreUnavailable(e.to_string())
}

#[async_trait]
impl GreetingStore for PostgresStore {
    async fn ping(&self) -> Result<()> {
        query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        query(CREATE_GREETINGS)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    #[instrument(skip(self, text_hex))]
    async fn insert(&self, token: &str, text_hex: &str) -> Result<()> {
        query("INSERT INTO greetings (token, text) VALUES ($1, $2)")
            .bind(token)
            .bind(text_hex)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        debug!("Greeting row appended");
        Ok(())
    }

    async fn fetch_text(&self, token: &str) -> Result<Option<String>> {
        query_scalar::<_, String>(
            "SELECT text FROM greetings WHERE token = $1 ORDER BY id ASC LIMIT 1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)
    }
}

#[async_trait]
impl RateTable for PostgresStore {
    async fn ping(&self) -> Result<()> {
        GreetingStore::ping(self).await
    }

    #[instrument(skip(self))]
    async fn best_match(&self, subscriber: &str) -> Result<Option<RateRecord>> {
        let row = query_as::<_, RateRow>(BEST_RATE)
            .bind(subscriber)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(row.map(|(id, prefix, scaled_rate, trunk, len)| RateRecord {
            id,
            prefix,
            scaled_rate,
            trunk,
            len: len.max(0) as u32,
        }))
    }
}

/// Masks the password in a database URL for logging.
fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.find('@')
        && let Some(colon_pos) = url[..at_pos].rfind(':')
    {
        let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
        if colon_pos > scheme_end {
            return format!("{}:****{}", &url[..colon_pos], &url[at_pos..]);
        }
    }
    url.to_string()
}
