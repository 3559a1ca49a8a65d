//! DuckDB secure store implementation
//!
//! Keeps every key in a single `sys_secure_store` table. When an encryption
//! key is supplied the database file is attached with DuckDB's AES-256-GCM
//! encryption, so values are encrypted at rest.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use duckdb::{params, Connection, OptionalExt};

use crate::domain::result::{Error, Result};
use crate::ports::SecureStore;
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

/// `path` as a single-quoted SQL string literal
pub(crate) fn sql_path_literal(path: &Path) -> String {
    format!("'{}'", path.display().to_string().replace('\'', "''"))
}

/// DuckDB-backed [`SecureStore`]
pub struct DuckDbSecureStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl DuckDbSecureStore {
    /// Open (or create) the store database
    ///
    /// For encrypted databases, uses DuckDB's ATTACH with ENCRYPTION_KEY.
    /// The key should be the hex-encoded derived key from Argon2.
    ///
    /// Opening retries with exponential backoff while another process holds
    /// the file lock.
    pub fn new(db_path: &Path, encryption_key: Option<&str>) -> Result<Self> {
        let mut attempt = 0;
        loop {
            match Self::try_open_connection(db_path, encryption_key) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: db_path.to_path_buf(),
                    });
                }
                Err(e) if is_retryable_error(&e.to_string()) && attempt < MAX_RETRIES - 1 => {
                    let delay = Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                    tracing::warn!(
                        attempt = attempt + 1,
                        max = MAX_RETRIES,
                        delay_ms = delay.as_millis() as u64,
                        "store database busy, retrying: {}",
                        e
                    );
                    thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Attempt to open a database connection (called by new() with retry logic)
    fn try_open_connection(db_path: &Path, encryption_key: Option<&str>) -> Result<Connection> {
        // Extension autoloading stays off; json and parquet are statically linked
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = if let Some(key) = encryption_key {
            // Encrypted database: open in-memory first, then ATTACH encrypted file
            let conn = Connection::open_in_memory_with_flags(config)?;
            conn.execute(
                &format!(
                    "ATTACH {} AS main_db (ENCRYPTION_KEY '{}')",
                    sql_path_literal(db_path),
                    key
                ),
                [],
            )?;
            conn.execute("USE main_db", [])?;
            conn
        } else {
            Connection::open_with_flags(db_path, config)?
        };

        Ok(conn)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))
    }

    /// Run pending schema migrations
    pub fn run_migrations(&self) -> Result<MigrationResult> {
        let conn = self.lock()?;
        MigrationService::new(&conn)
            .run_pending()
            .map_err(|e| Error::storage(format!("Migration failed: {:#}", e)))
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    /// Keys currently present, in key order
    pub fn keys(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT item_key FROM sys_secure_store ORDER BY item_key")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    /// Flush the write-ahead log into the database file
    pub fn checkpoint(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch("CHECKPOINT")?;
        Ok(())
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

impl SecureStore for DuckDbSecureStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT item_value FROM sys_secure_store WHERE item_key = ?",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO sys_secure_store (item_key, item_value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT (item_key) DO UPDATE SET
                item_value = EXCLUDED.item_value,
                updated_at = EXCLUDED.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn delete_item(&self, key: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM sys_secure_store WHERE item_key = ?", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open(dir: &TempDir) -> DuckDbSecureStore {
        let store = DuckDbSecureStore::new(&dir.path().join("vitrine.duckdb"), None).unwrap();
        store.ensure_schema().unwrap();
        store
    }

    #[test]
    fn test_missing_key_is_none() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);
        assert_eq!(store.get_item("user").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites_and_delete_removes() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);

        store.set_item("user", r#"{"id":"1"}"#).unwrap();
        store.set_item("user", r#"{"id":"2"}"#).unwrap();
        assert_eq!(store.get_item("user").unwrap().as_deref(), Some(r#"{"id":"2"}"#));
        assert_eq!(store.keys().unwrap(), vec!["user".to_string()]);

        store.delete_item("user").unwrap();
        assert_eq!(store.get_item("user").unwrap(), None);

        // Deleting again is fine
        store.delete_item("user").unwrap();
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = open(&dir);
            store.set_item("products", "[]").unwrap();
        }
        let store = open(&dir);
        assert_eq!(store.get_item("products").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_sql_path_literal_escapes_quotes() {
        assert_eq!(sql_path_literal(Path::new("/data/vitrine.duckdb")), "'/data/vitrine.duckdb'");
        assert_eq!(
            sql_path_literal(Path::new("/home/o'brien/vitrine.duckdb")),
            "'/home/o''brien/vitrine.duckdb'"
        );
    }

    #[test]
    fn test_encrypted_store_in_quoted_dir() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("o'brien");
        std::fs::create_dir_all(&data_dir).unwrap();
        let db_path = data_dir.join("vitrine.duckdb");
        let key = "00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff";

        {
            let store = DuckDbSecureStore::new(&db_path, Some(key)).unwrap();
            store.ensure_schema().unwrap();
            store.set_item("user", r#"{"id":"1"}"#).unwrap();
        }

        let store = DuckDbSecureStore::new(&db_path, Some(key)).unwrap();
        assert_eq!(store.get_item("user").unwrap().as_deref(), Some(r#"{"id":"1"}"#));
    }

    #[test]
    fn test_retryable_error_detection() {
        assert!(is_retryable_error("IO Error: Could not set lock on file: database is locked"));
        assert!(is_retryable_error("Resource temporarily unavailable"));
        assert!(!is_retryable_error("Catalog Error: Table does not exist"));
    }
}
