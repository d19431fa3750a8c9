//! Audit record for one provider exchange, and the storage seam it is
//! appended through.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;

/// One row of the `logs` table. Built once per completed provider call and
/// never modified afterwards; the id is assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    pub http_method: String,
    pub request_url: String,
    pub request_body: String,
    pub request_headers: String,
    pub response_headers: String,
    pub response_body: String,
    pub status_code: i32,
    /// Reserved column, always empty.
    pub error_message: String,
    pub user_agent: String,
    pub ip_address: String,
    pub duration: Duration,
    pub request_timestamp: DateTime<Utc>,
    pub response_timestamp: DateTime<Utc>,
    /// `-1` when unknown.
    pub request_size: i64,
    /// `-1` when unknown.
    pub response_size: i64,
    pub request_id: String,
}

impl AuditRecord {
    /// Elapsed time in whole milliseconds, saturating at `i64::MAX`.
    pub fn duration_ms(&self) -> i64 {
        i64::try_from(self.duration.as_millis()).unwrap_or(i64::MAX)
    }
}

/// Append-only persistence for audit records.
///
/// Implementations perform a single insert per call and never update or
/// delete rows. An `Err` means the record is not durable and the caller must
/// not surface the provider response.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Append one record, returning the id the store assigned to it.
    async fn append(&self, record: &AuditRecord) -> Result<i64>;

    /// Short backend name for log lines.
    fn backend(&self) -> &str;
}
