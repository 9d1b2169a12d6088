use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;

use crate::model::{
    DatabaseError, DatabaseResult, DbConnection,
    blob::{BlobStore, CounterStore},
};

/// PostgreSQL backend over the `kv_blobs` and `kv_counters` tables.
#[derive(Debug, Clone)]
pub struct PgStore {
    db: DbConnection,
}

impl PgStore {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn to_u64(namespace: &str, value: i64) -> DatabaseResult<u64> {
        u64::try_from(value).map_err(|_| DatabaseError::InvalidCounter {
            namespace: namespace.to_string(),
            value,
        })
    }
}

#[async_trait]
impl BlobStore for PgStore {
    async fn load(&self, namespace: &str) -> DatabaseResult<Option<Value>> {
        let result: Option<Json<Value>> =
            sqlx::query_scalar("SELECT body FROM kv_blobs WHERE namespace = $1")
                .bind(namespace)
                .fetch_optional(self.db.pool())
                .await?;

        Ok(result.map(|Json(body)| body))
    }

    async fn save(&self, namespace: &str, body: &Value) -> DatabaseResult<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_blobs (namespace, body, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (namespace) DO UPDATE SET body = EXCLUDED.body, updated_at = now()
            "#,
        )
        .bind(namespace)
        .bind(Json(body))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }
}

#[async_trait]
impl CounterStore for PgStore {
    async fn increment(&self, namespace: &str) -> DatabaseResult<u64> {
        // single statement, so concurrent callers never observe the same value
        let value: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO kv_counters (namespace, value) VALUES ($1, 1)
            ON CONFLICT (namespace) DO UPDATE SET value = kv_counters.value + 1
            RETURNING value
            "#,
        )
        .bind(namespace)
        .fetch_one(self.db.pool())
        .await?;

        Self::to_u64(namespace, value)
    }

    async fn current(&self, namespace: &str) -> DatabaseResult<u64> {
        let value: Option<i64> =
            sqlx::query_scalar("SELECT value FROM kv_counters WHERE namespace = $1")
                .bind(namespace)
                .fetch_optional(self.db.pool())
                .await?;

        Self::to_u64(namespace, value.unwrap_or(0))
    }
}
