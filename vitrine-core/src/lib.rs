//! Vitrine Core - session and product catalog for a small storefront
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core entities (User, Product) and form validation
//! - **ports**: Trait definitions for external dependencies (SecureStore)
//! - **services**: The session and catalog stores, plus backup, encryption and logging
//! - **adapters**: Concrete implementations (DuckDB, in-memory) and seed data
//! - **navigation**: Typed routes and the session gate

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod navigation;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::duckdb::DuckDbSecureStore;
use adapters::memory::MemorySecureStore;
use config::Config;
use navigation::{Navigator, Route};
use ports::SecureStore;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{
    BackupMetadata, EncryptionMetadata, EncryptionStatus, NewProduct, Product, ProductPatch, User,
};
pub use services::{EntryPoint, LogEvent, LoggingService};

/// Store database filename inside the data directory
pub const STORE_DB: &str = "vitrine.duckdb";

/// Main context for Vitrine operations
///
/// Owns both stores over one secure store, plus the navigator that gates
/// screens on the session. Built once per process and passed around
/// explicitly.
pub struct VitrineContext {
    pub config: Config,
    pub store: Arc<dyn SecureStore>,
    pub session: SessionService,
    pub catalog: CatalogService,
    pub navigator: Navigator,
    data_dir: Option<PathBuf>,
}

impl VitrineContext {
    /// Open the store database in `data_dir` and initialize both stores
    pub fn new(data_dir: &Path, encryption_key: Option<&str>) -> Result<Self> {
        let config = Config::load(data_dir)?;

        let db_path = data_dir.join(STORE_DB);
        let store = DuckDbSecureStore::new(&db_path, encryption_key)
            .with_context(|| format!("Failed to open {}", db_path.display()))?;
        store.ensure_schema()?;

        let mut context = Self::with_store(config, Arc::new(store));
        context.data_dir = Some(data_dir.to_path_buf());
        Ok(context)
    }

    /// Build over any secure store and initialize both stores
    pub fn with_store(config: Config, store: Arc<dyn SecureStore>) -> Self {
        let mut session = SessionService::new(Arc::clone(&store));
        let mut catalog = CatalogService::new(Arc::clone(&store));
        session.initialize();
        catalog.initialize();

        let mut navigator = Navigator::new();
        navigator.reset(&session);

        Self {
            config,
            store,
            session,
            catalog,
            navigator,
            data_dir: None,
        }
    }

    /// Context over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::with_store(Config::default(), Arc::new(MemorySecureStore::new()))
    }

    /// Data directory, if the context is backed by files
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// Navigate to `route` and return where the session gate let us land
    pub fn guard(&mut self, route: Route) -> Route {
        self.navigator.navigate(route, &self.session).clone()
    }

    pub fn status(&self) -> StatusSummary {
        StatusService::summary(&self.session, &self.catalog)
    }

    /// Profile statistics of the signed-in user
    pub fn profile_stats(&self) -> Option<ProfileStats> {
        self.session
            .current_user()
            .map(|user| StatusService::profile_stats(&self.catalog, &user.id))
    }

    /// One dashboard page of the filtered catalog
    pub fn list_products(&self, filter: &ProductFilter, page: usize) -> Page<&Product> {
        paginate(filter.apply(self.catalog.products()), page, self.config.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_context_is_ready() {
        let ctx = VitrineContext::in_memory();
        assert!(ctx.session.is_ready());
        assert_eq!(ctx.catalog.len(), 5);
        assert_eq!(ctx.navigator.current(), &Route::Login);
        assert!(ctx.data_dir().is_none());
    }

    #[test]
    fn test_guard_follows_session() {
        let mut ctx = VitrineContext::in_memory();
        assert_eq!(ctx.guard(Route::AddProduct), Route::Login);

        ctx.session.login("test@example.com", "password123");
        assert_eq!(ctx.guard(Route::AddProduct), Route::AddProduct);
        assert!(ctx.profile_stats().is_some());
    }

    #[test]
    fn test_list_products_uses_page_size() {
        let mut ctx = VitrineContext::in_memory();
        ctx.config.page_size = 2;

        let page = ctx.list_products(&ProductFilter::default(), 3);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Livre de cuisine");
    }
}
