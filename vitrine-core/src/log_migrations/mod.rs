//! Event log database migrations - embedded SQL files
//!
//! Kept separate from the store migrations: logs.duckdb is never encrypted
//! and never backed up.

/// All log migrations, embedded at compile time.
/// Format: (filename, sql_content)
pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    ("001_event_log.sql", include_str!("001_event_log.sql")),
];
