//! Repository for the token/pair list cache.

use sqlx::sqlite::SqlitePool;
use sqlx::Row;

/// Repository for database operations.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Read a cached payload if it was written within `max_age_ms` of `now_ms`.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn read_cached(
        &self,
        name: &str,
        max_age_ms: i64,
        now_ms: i64,
    ) -> Result<Option<String>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT payload FROM registry_cache
            WHERE name = ? AND fetched_at_ms > ?
            "#,
        )
        .bind(name)
        .bind(now_ms.saturating_sub(max_age_ms))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.get::<String, _>("payload")))
    }

    /// Store a payload, replacing any earlier one under the same name.
    ///
    /// # Errors
    /// Returns an error if the upsert fails.
    pub async fn write_cached(&self, name: &str, payload: &str, now_ms: i64) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO registry_cache (name, payload, fetched_at_ms)
            VALUES (?, ?, ?)
            ON CONFLICT(name) DO UPDATE SET
                payload = excluded.payload,
                fetched_at_ms = excluded.fetched_at_ms
            "#,
        )
        .bind(name)
        .bind(payload)
        .bind(now_ms)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
