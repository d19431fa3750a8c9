//! PostgreSQL connection pool and startup migration.

use std::str::FromStr;
use std::time::Duration;

use promptlog_common::{PromptlogError, Result};
use promptlog_config::DatabaseConfig;
use secrecy::ExposeSecret;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};

use crate::schema;

/// Main database handle. Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Open a pool using the configured connection parameters.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = connect_options(config)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_with(options)
            .await?;

        tracing::info!(
            host = %config.host,
            port = config.port,
            dbname = %config.dbname,
            "✅ PostgreSQL connected"
        );
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the audit table if it doesn't exist and backfill any
    /// missing columns.
    pub async fn initialize(&self) -> Result<()> {
        for stmt in schema::migrations() {
            sqlx::query(&stmt).execute(&self.pool).await?;
        }
        tracing::info!(table = schema::TABLE_LOGS, "Schema migrated");
        Ok(())
    }

    /// Check if a table exists in the current schema.
    pub async fn table_exists(&self, name: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM information_schema.tables \
             WHERE table_schema = current_schema() AND table_name = $1)",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}

fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions> {
    let ssl_mode = PgSslMode::from_str(&config.sslmode)
        .map_err(|e| PromptlogError::Config(format!("database.sslmode: {e}")))?;

    Ok(PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(config.password.expose_secret())
        .database(&config.dbname)
        .ssl_mode(ssl_mode))
}
