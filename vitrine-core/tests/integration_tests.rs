//! Integration tests for vitrine-core
//!
//! These tests run the stores against real DuckDB files in temp directories
//! and check that every mutation is visible to a context opened afterwards.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use tempfile::TempDir;

use vitrine_core::adapters::duckdb::DuckDbSecureStore;
use vitrine_core::config::Config;
use vitrine_core::domain::Argon2Params;
use vitrine_core::navigation::Route;
use vitrine_core::ports::{SecureStore, PRODUCTS_KEY, USER_KEY};
use vitrine_core::services::{
    BackupService, CatalogService, EncryptionService, ProductFilter, SessionService,
};
use vitrine_core::{NewProduct, ProductPatch, VitrineContext, STORE_DB};

// ============================================================================
// Test Helpers
// ============================================================================

fn open(dir: &TempDir) -> VitrineContext {
    VitrineContext::new(dir.path(), None).expect("Failed to open context")
}

fn open_store(dir: &TempDir) -> DuckDbSecureStore {
    let store = DuckDbSecureStore::new(&dir.path().join(STORE_DB), None).unwrap();
    store.ensure_schema().unwrap();
    store
}

fn lamp(created_by: &str) -> NewProduct {
    NewProduct {
        name: "Desk Lamp".to_string(),
        description: "Warm LED light".to_string(),
        price: Decimal::from_str("34.90").unwrap(),
        stock: 12,
        category: "Maison".to_string(),
        vendeurs: "HomeStore".to_string(),
        image: "https://example.com/lamp.jpg".to_string(),
        is_active: true,
        created_by: Some(created_by.to_string()),
    }
}

// ============================================================================
// Write-through
// ============================================================================

#[test]
fn test_first_open_installs_seed_on_disk() {
    let dir = TempDir::new().unwrap();
    {
        let ctx = open(&dir);
        assert_eq!(ctx.catalog.len(), 5);
        assert!(ctx.session.current_user().is_none());
        assert_eq!(ctx.navigator.current(), &Route::Login);
    }

    let store = open_store(&dir);
    let raw = store.get_item(PRODUCTS_KEY).unwrap().expect("seed persisted");
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 5);
    assert_eq!(json[0]["isActive"], serde_json::json!(true));
    assert_eq!(json[0]["price"], serde_json::json!(999.99));
    assert!(store.get_item(USER_KEY).unwrap().is_none());
}

#[test]
fn test_catalog_mutations_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let (added_id, expected) = {
        let mut ctx = open(&dir);
        assert!(ctx.session.login("test@example.com", "password123"));

        let added = ctx.catalog.add(lamp("1"));
        assert!(added.is_ok());
        let added_id = added.data.unwrap().id;

        assert!(ctx.catalog.update("3", ProductPatch::price(Decimal::from(99))).is_ok());
        assert_eq!(ctx.catalog.delete("5").data, Some(true));

        (added_id, ctx.catalog.products().to_vec())
    };

    let ctx = open(&dir);
    assert_eq!(ctx.catalog.products(), expected.as_slice());
    assert_eq!(ctx.catalog.get("3").unwrap().price, Decimal::from(99));
    assert!(ctx.catalog.get("5").is_none());
    assert_eq!(ctx.catalog.get(&added_id).unwrap().created_by.as_deref(), Some("1"));
    assert_eq!(ctx.session.current_user().unwrap().id, "1");
    assert_eq!(ctx.navigator.current(), &Route::Dashboard);
}

#[test]
fn test_empty_catalog_is_not_reseeded() {
    let dir = TempDir::new().unwrap();
    {
        let mut ctx = open(&dir);
        for id in ["1", "2", "3", "4", "5"] {
            assert!(ctx.catalog.delete(id).is_ok());
        }
        assert!(ctx.catalog.is_empty());
    }

    let ctx = open(&dir);
    assert!(ctx.catalog.is_empty());
}

#[test]
fn test_logout_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let mut ctx = open(&dir);
        ctx.session.login("admin@example.com", "admin123");
    }
    {
        let mut ctx = open(&dir);
        assert_eq!(ctx.session.current_user().unwrap().name, "Admin User");
        ctx.session.logout();
    }

    let ctx = open(&dir);
    assert!(ctx.session.current_user().is_none());
}

#[test]
fn test_profile_update_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let mut ctx = open(&dir);
        ctx.session.login("test@example.com", "password123");
        assert!(ctx.session.update_profile("Johnny", "johnny@example.com"));
    }

    let ctx = open(&dir);
    let user = ctx.session.current_user().unwrap();
    assert_eq!(user.name, "Johnny");
    assert_eq!(user.email, "johnny@example.com");
    assert_eq!(user.id, "1");
}

// ============================================================================
// Corrupt storage
// ============================================================================

#[test]
fn test_corrupt_catalog_falls_back_to_seed_without_overwriting() {
    let dir = TempDir::new().unwrap();
    {
        let store = open_store(&dir);
        store.set_item(PRODUCTS_KEY, "{broken").unwrap();
        store.set_item(USER_KEY, "also broken").unwrap();
    }

    {
        let ctx = open(&dir);
        assert_eq!(ctx.catalog.len(), 5);
        assert!(ctx.session.is_ready());
        assert!(ctx.session.current_user().is_none());
    }

    let store = open_store(&dir);
    assert_eq!(store.get_item(PRODUCTS_KEY).unwrap().as_deref(), Some("{broken"));
}

// ============================================================================
// Stores sharing one DuckDB store
// ============================================================================

#[test]
fn test_stores_share_one_secure_store() {
    let dir = TempDir::new().unwrap();
    let store: Arc<dyn SecureStore> = Arc::new(open_store(&dir));

    let mut session = SessionService::new(Arc::clone(&store));
    let mut catalog = CatalogService::new(Arc::clone(&store));
    session.initialize();
    catalog.initialize();

    assert!(session.register("new@example.com", "secret1", "New Seller"));
    let user_id = session.current_user().unwrap().id.clone();
    catalog.add(lamp(&user_id));

    let mut fresh = CatalogService::new(Arc::clone(&store));
    fresh.initialize();
    assert_eq!(fresh.products_created_by(&user_id).len(), 1);
}

// ============================================================================
// Config and listing
// ============================================================================

#[test]
fn test_page_size_from_settings() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("settings.json"), r#"{"app":{"pageSize":2}}"#).unwrap();

    let ctx = open(&dir);
    assert_eq!(ctx.config.page_size, 2);

    let page = ctx.list_products(&ProductFilter::default(), 1);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_pages, 3);

    let filter = ProductFilter {
        category: Some("Électronique".to_string()),
        ..ProductFilter::default()
    };
    let page = ctx.list_products(&filter, 2);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "Samsung Galaxy S24");
}

#[test]
fn test_config_save_then_load() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        page_size: 3,
        event_logging: false,
    };
    config.save(dir.path()).unwrap();

    let loaded = Config::load(dir.path()).unwrap();
    assert_eq!(loaded.page_size, 3);
    assert!(!loaded.event_logging);
}

// ============================================================================
// Backup round trip
// ============================================================================

#[test]
fn test_backup_restore_brings_back_catalog() {
    let dir = TempDir::new().unwrap();
    {
        let mut ctx = open(&dir);
        ctx.catalog.add(lamp("1"));
        assert_eq!(ctx.catalog.len(), 6);
    }

    let backups = BackupService::new(dir.path().to_path_buf(), STORE_DB);
    let backup = backups.create(None).unwrap();

    {
        let mut ctx = open(&dir);
        let ids: Vec<String> = ctx.catalog.products().iter().map(|p| p.id.clone()).collect();
        for id in ids {
            ctx.catalog.delete(&id);
        }
    }
    assert!(open(&dir).catalog.is_empty());

    backups.restore(&backup.name).unwrap();
    let ctx = open(&dir);
    assert_eq!(ctx.catalog.len(), 6);
}

// ============================================================================
// Encryption round trip
// ============================================================================

fn encryption_service(dir: &TempDir) -> EncryptionService {
    EncryptionService::new(dir.path().to_path_buf(), dir.path().join(STORE_DB)).with_argon2_params(
        Argon2Params {
            time_cost: 1,
            memory_cost: 1024,
            parallelism: 1,
            hash_len: 32,
        },
    )
}

#[test]
fn test_encrypt_then_decrypt_keeps_catalog() {
    let dir = TempDir::new().unwrap();
    let added_id = {
        let mut ctx = open(&dir);
        ctx.session.login("test@example.com", "password123");
        ctx.catalog.add(lamp("1")).data.unwrap().id
    };

    let encryption = encryption_service(&dir);
    let backups = BackupService::new(dir.path().to_path_buf(), STORE_DB);

    let result = encryption.encrypt("hunter22", &backups).unwrap();
    assert!(result.encrypted);
    assert!(result.backup_name.is_some());
    assert!(encryption.is_encrypted().unwrap());

    let wrong_key = encryption.derive_key_for_connection("wrong").unwrap();
    assert!(VitrineContext::new(dir.path(), Some(&wrong_key)).is_err());

    let key = encryption.derive_key_for_connection("hunter22").unwrap();
    {
        let ctx = VitrineContext::new(dir.path(), Some(&key)).unwrap();
        assert_eq!(ctx.catalog.len(), 6);
        assert_eq!(ctx.catalog.get(&added_id).unwrap().name, "Desk Lamp");
        assert_eq!(ctx.session.current_user().unwrap().id, "1");
    }

    let err = encryption.decrypt("wrong", &backups).unwrap_err();
    assert!(err.to_string().contains("Invalid password"));
    assert!(encryption.is_encrypted().unwrap());

    let result = encryption.decrypt("hunter22", &backups).unwrap();
    assert!(!result.encrypted);
    assert!(!encryption.is_encrypted().unwrap());

    let ctx = open(&dir);
    assert_eq!(ctx.catalog.len(), 6);
    assert_eq!(ctx.catalog.get(&added_id).unwrap().name, "Desk Lamp");
    assert_eq!(ctx.session.current_user().unwrap().id, "1");
}
