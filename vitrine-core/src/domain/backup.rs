//! Backup domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A backup archive of the store database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupMetadata {
    /// Archive filename, e.g. "vitrine-2025-01-15T10-30-00-000123.zip"
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
}

impl BackupMetadata {
    pub fn new(name: impl Into<String>, created_at: DateTime<Utc>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            created_at,
            size_bytes,
        }
    }

    /// Format size for human display
    pub fn size_display(&self) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;

        if self.size_bytes >= MB {
            format!("{:.1} MB", self.size_bytes as f64 / MB as f64)
        } else if self.size_bytes >= KB {
            format!("{:.1} KB", self.size_bytes as f64 / KB as f64)
        } else {
            format!("{} bytes", self.size_bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_display() {
        let meta = BackupMetadata::new("vitrine.zip", Utc::now(), 1536);
        assert_eq!(meta.size_display(), "1.5 KB");

        let meta = BackupMetadata::new("vitrine.zip", Utc::now(), 512);
        assert_eq!(meta.size_display(), "512 bytes");
    }
}
