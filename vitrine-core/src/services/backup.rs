//! Backup service - ZIP archives of the store database
//!
//! An archive holds the store database plus whichever config files exist.
//! The event log is not backed up.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::domain::BackupMetadata;

/// Config files to include in backup (relative to the data dir)
pub const CONFIG_FILES: &[&str] = &["settings.json", "encryption.json"];

const BACKUP_PREFIX: &str = "vitrine-";
const PRE_RESTORE_PREFIX: &str = "pre-restore-";

pub struct BackupService {
    data_dir: PathBuf,
    db_filename: String,
}

impl BackupService {
    pub fn new(data_dir: PathBuf, db_filename: impl Into<String>) -> Self {
        Self {
            data_dir,
            db_filename: db_filename.into(),
        }
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.data_dir.join("backups")
    }

    fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_filename)
    }

    /// Archive the database and config files, then keep at most `max_backups`
    pub fn create(&self, max_backups: Option<usize>) -> Result<BackupMetadata> {
        let db_path = self.db_path();
        if !db_path.exists() {
            anyhow::bail!("Database file not found");
        }
        fs::create_dir_all(self.backups_dir())?;

        let backup_name = backup_file_name("");
        let backup_path = self.backups_dir().join(&backup_name);

        let mut entries = vec![(self.db_filename.clone(), db_path)];
        for config_file in CONFIG_FILES {
            let config_path = self.data_dir.join(config_file);
            if config_path.exists() {
                entries.push((config_file.to_string(), config_path));
            }
        }
        write_archive(&backup_path, &entries).context("Failed to create backup file")?;

        let size_bytes = fs::metadata(&backup_path)?.len();

        if let Some(max) = max_backups {
            self.apply_retention(max)?;
        }

        tracing::debug!(name = %backup_name, size_bytes, "backup created");
        Ok(BackupMetadata::new(backup_name, Utc::now(), size_bytes))
    }

    /// Backups, newest first
    pub fn list(&self) -> Result<Vec<BackupMetadata>> {
        let backups_dir = self.backups_dir();
        if !backups_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();
        for entry in fs::read_dir(&backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("zip") {
                continue;
            }
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) if name.starts_with(BACKUP_PREFIX) => name.to_string(),
                _ => continue,
            };

            let size_bytes = fs::metadata(&path)?.len();
            let created_at = parse_backup_time(&name);
            backups.push(BackupMetadata::new(name, created_at, size_bytes));
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(backups)
    }

    /// Replace the database and config files with the contents of a backup.
    ///
    /// The current database is archived first under a `pre-restore` name.
    /// Config files missing from the backup are removed, so restoring an
    /// unencrypted backup drops encryption.json.
    pub fn restore(&self, backup_name: &str) -> Result<()> {
        let backup_path = self.backups_dir().join(backup_name);
        if !backup_path.exists() {
            anyhow::bail!("Backup not found: {}", backup_name);
        }

        let db_path = self.db_path();
        if db_path.exists() {
            let pre_restore = self.backups_dir().join(backup_file_name(PRE_RESTORE_PREFIX));
            write_archive(&pre_restore, &[(self.db_filename.clone(), db_path.clone())])
                .context("Failed to archive current database")?;
        }

        let file = File::open(&backup_path)?;
        let mut archive = ZipArchive::new(file)?;
        let mut restored_configs = HashSet::new();

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let name = entry.name().to_string();

            let target_path = if name.ends_with(".duckdb") {
                db_path.clone()
            } else if CONFIG_FILES.contains(&name.as_str()) {
                restored_configs.insert(name.clone());
                self.data_dir.join(&name)
            } else {
                tracing::warn!(entry = %name, "skipping unexpected backup entry");
                continue;
            };

            let mut outfile = File::create(&target_path)?;
            std::io::copy(&mut entry, &mut outfile)?;
        }

        for config_file in CONFIG_FILES {
            if !restored_configs.contains(*config_file) {
                let config_path = self.data_dir.join(config_file);
                if config_path.exists() {
                    fs::remove_file(&config_path)?;
                }
            }
        }

        Ok(())
    }

    /// Delete every backup
    pub fn clear(&self) -> Result<ClearResult> {
        let backups = self.list()?;
        for backup in &backups {
            fs::remove_file(self.backups_dir().join(&backup.name))?;
        }
        Ok(ClearResult {
            deleted: backups.len(),
        })
    }

    fn apply_retention(&self, max_backups: usize) -> Result<()> {
        let mut backups = self.list()?;
        while backups.len() > max_backups {
            if let Some(oldest) = backups.pop() {
                fs::remove_file(self.backups_dir().join(&oldest.name))?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ClearResult {
    pub deleted: usize,
}

fn backup_file_name(kind: &str) -> String {
    let now = Utc::now();
    format!(
        "{}{}{}-{:06}.zip",
        BACKUP_PREFIX,
        kind,
        now.format("%Y-%m-%dT%H-%M-%S"),
        now.timestamp_subsec_micros()
    )
}

/// Creation time encoded in a backup file name, or now when it cannot be parsed
fn parse_backup_time(backup_name: &str) -> DateTime<Utc> {
    backup_name
        .strip_prefix(BACKUP_PREFIX)
        .map(|s| s.strip_prefix(PRE_RESTORE_PREFIX).unwrap_or(s))
        .and_then(|s| s.strip_suffix(".zip"))
        .and_then(|ts| {
            NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H-%M-%S-%6f")
                .or_else(|_| NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H-%M-%S"))
                .ok()
        })
        .map(|dt| dt.and_utc())
        .unwrap_or_else(Utc::now)
}

fn write_archive(archive_path: &Path, entries: &[(String, PathBuf)]) -> Result<()> {
    let file = File::create(archive_path)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut buffer = Vec::new();
    for (name, path) in entries {
        zip.start_file(name.as_str(), options)?;
        buffer.clear();
        File::open(path)?.read_to_end(&mut buffer)?;
        zip.write_all(&buffer)?;
    }

    zip.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use tempfile::TempDir;

    fn setup() -> (TempDir, BackupService) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("vitrine.duckdb"), b"original").unwrap();
        fs::write(dir.path().join("settings.json"), b"{\"pageSize\":4}").unwrap();
        let service = BackupService::new(dir.path().to_path_buf(), "vitrine.duckdb");
        (dir, service)
    }

    #[test]
    fn test_create_and_list() {
        let (_dir, service) = setup();
        let backup = service.create(None).unwrap();
        assert!(backup.name.starts_with("vitrine-"));
        assert!(backup.size_bytes > 0);

        let listed = service.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, backup.name);
    }

    #[test]
    fn test_create_without_database_fails() {
        let dir = TempDir::new().unwrap();
        let service = BackupService::new(dir.path().to_path_buf(), "vitrine.duckdb");
        assert!(service.create(None).is_err());
    }

    #[test]
    fn test_restore_replaces_files() {
        let (dir, service) = setup();
        let backup = service.create(None).unwrap();

        fs::write(dir.path().join("vitrine.duckdb"), b"changed").unwrap();
        fs::remove_file(dir.path().join("settings.json")).unwrap();
        fs::write(dir.path().join("encryption.json"), b"{}").unwrap();

        service.restore(&backup.name).unwrap();

        assert_eq!(fs::read(dir.path().join("vitrine.duckdb")).unwrap(), b"original");
        assert!(dir.path().join("settings.json").exists());
        assert!(!dir.path().join("encryption.json").exists());

        // The pre-restore archive is listed too
        assert_eq!(service.list().unwrap().len(), 2);
    }

    #[test]
    fn test_restore_missing_backup() {
        let (_dir, service) = setup();
        assert!(service.restore("vitrine-nope.zip").is_err());
    }

    #[test]
    fn test_retention_and_clear() {
        let (_dir, service) = setup();
        for _ in 0..3 {
            service.create(Some(2)).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert_eq!(service.list().unwrap().len(), 2);

        assert_eq!(service.clear().unwrap().deleted, 2);
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_parse_backup_time() {
        let at = parse_backup_time("vitrine-2025-03-04T05-06-07-000123.zip");
        assert_eq!((at.year(), at.month(), at.day()), (2025, 3, 4));
        assert_eq!((at.hour(), at.minute(), at.second()), (5, 6, 7));

        let at = parse_backup_time("vitrine-pre-restore-2025-03-04T05-06-07-000123.zip");
        assert_eq!(at.year(), 2025);
    }
}
