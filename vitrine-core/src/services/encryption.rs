//! Encryption service - store database encryption at rest
//!
//! Uses DuckDB's native AES-256-GCM encryption with an Argon2id-derived key.
//! The salt and parameters live in encryption.json next to the database;
//! the password itself is never stored.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use base64::Engine;
use duckdb::Connection;
use rand::Rng;
use serde::Serialize;

use crate::adapters::duckdb::sql_path_literal;
use crate::domain::{Argon2Params, EncryptionMetadata, EncryptionStatus};
use crate::services::BackupService;

const ENCRYPTION_FILE: &str = "encryption.json";
const SALT_LEN: usize = 16;

pub struct EncryptionService {
    data_dir: PathBuf,
    db_path: PathBuf,
    argon2_params: Argon2Params,
}

impl EncryptionService {
    pub fn new(data_dir: PathBuf, db_path: PathBuf) -> Self {
        Self {
            data_dir,
            db_path,
            argon2_params: Argon2Params::default(),
        }
    }

    /// Parameters used when encrypting. Decryption always uses the stored ones.
    pub fn with_argon2_params(mut self, params: Argon2Params) -> Self {
        self.argon2_params = params;
        self
    }

    fn encryption_file(&self) -> PathBuf {
        self.data_dir.join(ENCRYPTION_FILE)
    }

    fn load_metadata(&self) -> Result<Option<EncryptionMetadata>> {
        let enc_file = self.encryption_file();
        if !enc_file.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&enc_file)
            .with_context(|| format!("Failed to read {}", enc_file.display()))?;
        let metadata = serde_json::from_str(&content).context("Invalid encryption metadata")?;
        Ok(Some(metadata))
    }

    pub fn get_status(&self) -> Result<EncryptionStatus> {
        Ok(match self.load_metadata()? {
            Some(metadata) => EncryptionStatus::from_metadata(&metadata),
            None => EncryptionStatus::unencrypted(),
        })
    }

    pub fn is_encrypted(&self) -> Result<bool> {
        Ok(self.get_status()?.encrypted)
    }

    /// Hex key to pass to `ATTACH ... (ENCRYPTION_KEY ...)`
    pub fn derive_key_for_connection(&self, password: &str) -> Result<String> {
        let metadata = match self.load_metadata()? {
            Some(metadata) if metadata.encrypted => metadata,
            _ => anyhow::bail!("Database is not encrypted"),
        };
        let salt = base64::engine::general_purpose::STANDARD
            .decode(&metadata.salt)
            .context("Invalid salt in encryption metadata")?;
        let key = derive_key(password, &salt, &metadata.argon2_params)?;
        Ok(hex::encode(key))
    }

    /// Encrypt the store database in place. A backup is taken first.
    pub fn encrypt(&self, password: &str, backup_service: &BackupService) -> Result<EncryptResult> {
        if self.is_encrypted()? {
            anyhow::bail!("Database is already encrypted");
        }
        if !self.db_path.exists() {
            anyhow::bail!("Database file not found");
        }

        let backup = backup_service.create(None)?;

        let salt: [u8; SALT_LEN] = rand::thread_rng().gen();
        let key_hex = hex::encode(derive_key(password, &salt, &self.argon2_params)?);

        let export_dir = tempfile::tempdir().context("Failed to create temp directory for export")?;
        let temp_db_path = fresh_temp_path()?;

        {
            let conn = Connection::open_with_flags(&self.db_path, db_config()?)
                .context("Failed to open original database")?;
            export_database(&conn, export_dir.path())?;
        }

        {
            let conn = Connection::open_in_memory_with_flags(db_config()?)
                .context("Failed to open in-memory connection")?;
            conn.execute_batch(&format!(
                "ATTACH {} AS enc (ENCRYPTION_KEY '{}')",
                sql_path_literal(&temp_db_path),
                key_hex
            ))
            .context("Failed to attach encrypted database")?;
            conn.execute_batch("USE enc").context("Failed to use encrypted database")?;
            import_database(&conn, export_dir.path())?;
        }

        replace_file(&temp_db_path, &self.db_path)
            .context("Failed to replace original database with encrypted version")?;

        let salt_b64 = base64::engine::general_purpose::STANDARD.encode(salt);
        let metadata = EncryptionMetadata::new_encrypted(salt_b64, self.argon2_params.clone());
        fs::write(self.encryption_file(), serde_json::to_string_pretty(&metadata)?)?;

        tracing::debug!(backup = %backup.name, "store database encrypted");
        Ok(EncryptResult {
            encrypted: true,
            backup_name: Some(backup.name),
        })
    }

    /// Decrypt the store database in place. The password is checked before
    /// anything is touched; a backup is taken first.
    pub fn decrypt(&self, password: &str, backup_service: &BackupService) -> Result<EncryptResult> {
        if !self.is_encrypted()? {
            anyhow::bail!("Database is not encrypted");
        }
        let key_hex = self.derive_key_for_connection(password)?;

        let conn = self.attach_encrypted(&key_hex)?;
        conn.query_row(
            "SELECT table_name FROM information_schema.tables LIMIT 1",
            [],
            |_| Ok(()),
        )
        .map_err(|_| anyhow::anyhow!("Invalid password"))?;

        let backup = backup_service.create(None)?;

        let export_dir = tempfile::tempdir().context("Failed to create temp directory for export")?;
        let temp_db_path = fresh_temp_path()?;

        export_database(&conn, export_dir.path())?;
        drop(conn);

        {
            let conn = Connection::open_with_flags(&temp_db_path, db_config()?)
                .context("Failed to create new unencrypted database")?;
            import_database(&conn, export_dir.path())?;
        }

        replace_file(&temp_db_path, &self.db_path)
            .context("Failed to replace original database with decrypted version")?;
        fs::remove_file(self.encryption_file())?;

        tracing::debug!(backup = %backup.name, "store database decrypted");
        Ok(EncryptResult {
            encrypted: false,
            backup_name: Some(backup.name),
        })
    }

    fn attach_encrypted(&self, key_hex: &str) -> Result<Connection> {
        let conn = Connection::open_in_memory_with_flags(db_config()?)
            .context("Failed to open in-memory connection")?;
        conn.execute_batch(&format!(
            "ATTACH {} AS enc (ENCRYPTION_KEY '{}', READ_ONLY)",
            sql_path_literal(&self.db_path),
            key_hex
        ))
        .map_err(|_| anyhow::anyhow!("Invalid password"))?;
        conn.execute_batch("USE enc")
            .map_err(|_| anyhow::anyhow!("Invalid password"))?;
        Ok(conn)
    }
}

#[derive(Debug, Serialize)]
pub struct EncryptResult {
    /// Whether the database is now encrypted
    pub encrypted: bool,
    pub backup_name: Option<String>,
}

/// Derive a key from a password with Argon2id
fn derive_key(password: &str, salt: &[u8], params: &Argon2Params) -> Result<Vec<u8>> {
    let argon2_params = argon2::Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(params.hash_len as usize),
    )
    .map_err(|e| anyhow::anyhow!("Failed to create argon2 params: {:?}", e))?;

    let argon2 = argon2::Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, argon2_params);

    let mut key = vec![0u8; params.hash_len as usize];
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut key)
        .map_err(|e| anyhow::anyhow!("Failed to derive key: {:?}", e))?;
    Ok(key)
}

// Extension autoloading stays off; json and parquet are statically linked
fn db_config() -> Result<duckdb::Config> {
    duckdb::Config::default()
        .enable_autoload_extension(false)
        .context("Failed to configure database")
}

/// A temp path with no file behind it, so DuckDB can create the database fresh
fn fresh_temp_path() -> Result<PathBuf> {
    let temp_db = tempfile::NamedTempFile::new().context("Failed to create temp file")?;
    let path = temp_db.path().to_path_buf();
    drop(temp_db);
    if path.exists() {
        fs::remove_file(&path)?;
    }
    Ok(path)
}

fn export_database(conn: &Connection, dir: &Path) -> Result<()> {
    conn.execute_batch(&format!("EXPORT DATABASE {} (FORMAT PARQUET)", sql_path_literal(dir)))
        .context("Failed to export database")
}

fn import_database(conn: &Connection, dir: &Path) -> Result<()> {
    conn.execute_batch(&format!("IMPORT DATABASE {}", sql_path_literal(dir)))
        .context("Failed to import database")
}

fn replace_file(from: &Path, to: &Path) -> std::io::Result<()> {
    // rename fails across filesystems; fall back to copy
    fs::rename(from, to).or_else(|_| {
        fs::copy(from, to)?;
        fs::remove_file(from)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn light_params() -> Argon2Params {
        Argon2Params {
            time_cost: 1,
            memory_cost: 1024,
            parallelism: 1,
            hash_len: 32,
        }
    }

    #[test]
    fn test_status_without_metadata() {
        let dir = TempDir::new().unwrap();
        let service = EncryptionService::new(dir.path().to_path_buf(), dir.path().join("vitrine.duckdb"));
        assert!(!service.is_encrypted().unwrap());
        assert!(service.derive_key_for_connection("secret").is_err());
    }

    #[test]
    fn test_derived_key_depends_on_password_and_salt() {
        let params = light_params();
        let a = derive_key("secret", b"0123456789abcdef", &params).unwrap();
        let b = derive_key("secret", b"0123456789abcdef", &params).unwrap();
        let c = derive_key("other", b"0123456789abcdef", &params).unwrap();
        let d = derive_key("secret", b"fedcba9876543210", &params).unwrap();
        assert_eq!(a.len(), 32);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn test_key_for_connection_uses_stored_salt() {
        let dir = TempDir::new().unwrap();
        let salt = base64::engine::general_purpose::STANDARD.encode(b"0123456789abcdef");
        let metadata = EncryptionMetadata::new_encrypted(salt, light_params());
        fs::write(
            dir.path().join(ENCRYPTION_FILE),
            serde_json::to_string(&metadata).unwrap(),
        )
        .unwrap();

        let service = EncryptionService::new(dir.path().to_path_buf(), dir.path().join("vitrine.duckdb"));
        assert!(service.is_encrypted().unwrap());

        let key = service.derive_key_for_connection("secret").unwrap();
        let expected = derive_key("secret", b"0123456789abcdef", &light_params()).unwrap();
        assert_eq!(key, hex::encode(expected));
    }

    #[test]
    fn test_encrypt_requires_database() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("vitrine.duckdb");
        let service = EncryptionService::new(dir.path().to_path_buf(), db_path)
            .with_argon2_params(light_params());
        let backups = BackupService::new(dir.path().to_path_buf(), "vitrine.duckdb");

        let err = service.encrypt("secret", &backups).unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert!(service.decrypt("secret", &backups).is_err());
    }
}
