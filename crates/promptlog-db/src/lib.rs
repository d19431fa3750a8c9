//! promptlog Database Layer
//!
//! PostgreSQL storage for the audit log: connection pooling, idempotent
//! startup migration of the `logs` table, and the `AuditStore`
//! implementation used by both entry points.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use promptlog_common::AuditStore;
//! use promptlog_config::DatabaseConfig;
//! use promptlog_db::{Database, PgAuditStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect(&DatabaseConfig::default()).await?;
//!     db.initialize().await?;
//!
//!     let store: Arc<dyn AuditStore> = Arc::new(PgAuditStore::new(db.pool().clone()));
//!     Ok(())
//! }
//! ```

pub mod audit_log;
pub mod database;
pub mod schema;

pub use audit_log::PgAuditStore;
pub use database::Database;
pub use schema::TABLE_LOGS;
