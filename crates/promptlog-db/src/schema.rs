//! Schema for the audit log table.
//!
//! The table is created if absent and any column missing from an older
//! table is added, so startup migration is idempotent and never drops data.

/// Audit log table name.
pub const TABLE_LOGS: &str = "logs";

/// `(column, type)` for every column after `id`, in insert order.
pub const LOG_COLUMNS: &[(&str, &str)] = &[
    ("timestamp",          "TIMESTAMPTZ NOT NULL DEFAULT now()"),
    ("http_method",        "TEXT NOT NULL DEFAULT ''"),
    ("request_url",        "TEXT NOT NULL DEFAULT ''"),
    ("request_body",       "TEXT NOT NULL DEFAULT ''"),
    ("request_headers",    "TEXT NOT NULL DEFAULT ''"),
    ("response_body",      "TEXT NOT NULL DEFAULT ''"),
    ("response_headers",   "TEXT NOT NULL DEFAULT ''"),
    ("status_code",        "INTEGER NOT NULL DEFAULT 0"),
    ("error_message",      "TEXT NOT NULL DEFAULT ''"),
    ("user_agent",         "TEXT NOT NULL DEFAULT ''"),
    ("ip_address",         "TEXT NOT NULL DEFAULT ''"),
    ("duration_ms",        "BIGINT NOT NULL DEFAULT 0"),
    ("request_timestamp",  "TIMESTAMPTZ"),
    ("response_timestamp", "TIMESTAMPTZ"),
    ("request_size",       "BIGINT NOT NULL DEFAULT -1"),
    ("response_size",      "BIGINT NOT NULL DEFAULT -1"),
    ("request_id",         "TEXT NOT NULL DEFAULT ''"),
];

/// `CREATE TABLE IF NOT EXISTS logs (...)`.
pub fn create_logs_table() -> String {
    let columns = LOG_COLUMNS
        .iter()
        .map(|(name, ty)| format!("    {name} {ty}"))
        .collect::<Vec<_>>()
        .join(",\n");
    format!(
        "CREATE TABLE IF NOT EXISTS {TABLE_LOGS} (\n    id BIGSERIAL PRIMARY KEY,\n{columns}\n)"
    )
}

/// One `ALTER TABLE ... ADD COLUMN IF NOT EXISTS` per column.
pub fn add_missing_columns() -> Vec<String> {
    LOG_COLUMNS
        .iter()
        .map(|(name, ty)| format!("ALTER TABLE {TABLE_LOGS} ADD COLUMN IF NOT EXISTS {name} {ty}"))
        .collect()
}

pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_logs_timestamp ON logs (timestamp)",
    "CREATE INDEX IF NOT EXISTS idx_logs_request_id ON logs (request_id)",
];

/// Every statement run at startup, in order.
pub fn migrations() -> Vec<String> {
    let mut stmts = vec![create_logs_table()];
    stmts.extend(add_missing_columns());
    stmts.extend(CREATE_INDEXES.iter().map(|s| s.to_string()));
    stmts
}

/// The insert used by the audit store. `id` and `timestamp` come from the
/// column defaults.
pub fn insert_log() -> String {
    let names: Vec<&str> = LOG_COLUMNS
        .iter()
        .map(|(name, _)| *name)
        .filter(|name| *name != "timestamp")
        .collect();
    let placeholders = (1..=names.len())
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {TABLE_LOGS} ({}) VALUES ({placeholders}) RETURNING id",
        names.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create_table_is_idempotent_ddl() {
        let ddl = create_logs_table();
        assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS logs"));
        assert!(ddl.contains("id BIGSERIAL PRIMARY KEY"));
        for (name, _) in LOG_COLUMNS {
            assert!(ddl.contains(name), "missing column {name}");
        }
    }

    #[test]
    fn test_every_column_can_be_backfilled() {
        let alters = add_missing_columns();
        assert_eq!(alters.len(), LOG_COLUMNS.len());
        assert!(alters.iter().all(|s| s.contains("ADD COLUMN IF NOT EXISTS")));
    }

    #[test]
    fn test_insert_binds_sixteen_values() {
        let sql = insert_log();
        assert!(sql.contains("$16)"));
        assert!(!sql.contains("$17"));
        assert!(!sql.contains(" timestamp,"));
        assert!(!sql.contains("(timestamp,"));
        assert!(sql.ends_with("RETURNING id"));
        assert!(sql.starts_with(
            "INSERT INTO logs (http_method, request_url, request_body, request_headers, response_body"
        ));
    }

    #[test]
    fn test_migrations_start_with_create() {
        let stmts = migrations();
        assert_eq!(stmts[0], create_logs_table());
        assert_eq!(stmts.len(), 1 + LOG_COLUMNS.len() + CREATE_INDEXES.len());
    }
}
