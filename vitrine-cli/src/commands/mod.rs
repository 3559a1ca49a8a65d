//! CLI command implementations

pub mod auth;
pub mod backup;
pub mod encrypt;
pub mod logs;
pub mod products;
pub mod profile;
pub mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use dialoguer::{Input, Password};
use vitrine_core::config::Config;
use vitrine_core::navigation::Route;
use vitrine_core::services::EncryptionService;
use vitrine_core::{EntryPoint, LogEvent, LoggingService, VitrineContext, STORE_DB};

/// Env var holding an already derived database key (hex)
const DB_KEY_ENV: &str = "VITRINE_DB_KEY";

/// Env var holding the database password
const DB_PASSWORD_ENV: &str = "VITRINE_DB_PASSWORD";

pub const NOT_SIGNED_IN: &str = "Not signed in. Run 'vt login' first.";

/// Get the logging service for CLI operations
///
/// Returns None if event logging is disabled or fails to initialize
/// (logging never blocks operations)
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    let config = Config::load(&data_dir).unwrap_or_default();
    if !config.event_logging {
        return None;
    }
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))
        .map_err(|e| tracing::debug!("event log unavailable: {:#}", e))
        .ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        if let Err(e) = l.log(event) {
            tracing::debug!("failed to record event: {:#}", e);
        }
    }
}

/// Get the data directory from VITRINE_DIR or default to ~/.vitrine
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("VITRINE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".vitrine"))
        .context("Could not find home directory")
}

/// Open the context over the data directory
///
/// The encryption key comes from VITRINE_DB_KEY (pre-derived) or is derived
/// from VITRINE_DB_PASSWORD when the database is encrypted.
pub fn get_context() -> Result<VitrineContext> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

    let encryption_key = if let Ok(key) = std::env::var(DB_KEY_ENV) {
        tracing::debug!("using {}", DB_KEY_ENV);
        Some(key)
    } else if let Ok(password) = std::env::var(DB_PASSWORD_ENV) {
        let encryption_service = EncryptionService::new(data_dir.clone(), data_dir.join(STORE_DB));
        if encryption_service.is_encrypted()? {
            tracing::debug!("deriving key from {}", DB_PASSWORD_ENV);
            Some(
                encryption_service
                    .derive_key_for_connection(&password)
                    .context("Failed to derive encryption key from password")?,
            )
        } else {
            None
        }
    } else {
        None
    };

    VitrineContext::new(&data_dir, encryption_key.as_deref())
        .context("Failed to initialize vitrine context")
}

/// Enter a protected route, failing when nobody is signed in
pub fn require_route(ctx: &mut VitrineContext, route: Route) -> Result<Route> {
    let landed = ctx.guard(route.clone());
    if landed == Route::Login {
        anyhow::bail!(NOT_SIGNED_IN);
    }
    if landed != route {
        anyhow::bail!("Cannot open {} from {}", route, landed);
    }
    Ok(landed)
}

/// Use the flag value when given, otherwise prompt for it
pub fn value_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?),
    }
}

/// Same as [`value_or_prompt`], pre-filling the prompt with `current`
pub fn value_or_edit(value: Option<String>, prompt: &str, current: &str, interactive: bool) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None if !interactive => Ok(current.to_string()),
        None => Ok(Input::<String>::new()
            .with_prompt(prompt)
            .with_initial_text(current)
            .allow_empty(true)
            .interact_text()?),
    }
}

pub fn password_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()?),
    }
}
