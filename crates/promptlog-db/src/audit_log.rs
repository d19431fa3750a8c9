//! PostgreSQL-backed audit store.

use async_trait::async_trait;
use promptlog_common::{AuditRecord, AuditStore, Result};
use sqlx::PgPool;

use crate::schema;

/// Appends audit records to the `logs` table, one single-row insert per
/// record. Rows are never updated or deleted here.
#[derive(Clone)]
pub struct PgAuditStore {
    pool: PgPool,
    insert_sql: String,
}

impl PgAuditStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool, insert_sql: schema::insert_log() }
    }
}

#[async_trait]
impl AuditStore for PgAuditStore {
    async fn append(&self, record: &AuditRecord) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(&self.insert_sql)
            .bind(&record.http_method)
            .bind(&record.request_url)
            .bind(&record.request_body)
            .bind(&record.request_headers)
            .bind(&record.response_body)
            .bind(&record.response_headers)
            .bind(record.status_code)
            .bind(&record.error_message)
            .bind(&record.user_agent)
            .bind(&record.ip_address)
            .bind(record.duration_ms())
            .bind(record.request_timestamp)
            .bind(record.response_timestamp)
            .bind(record.request_size)
            .bind(record.response_size)
            .bind(&record.request_id)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(id, request_id = %record.request_id, "Audit record appended");
        Ok(id)
    }

    fn backend(&self) -> &str {
        "postgres"
    }
}
