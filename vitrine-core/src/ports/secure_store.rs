//! Secure store port - opaque key-value persistence
//!
//! The platform's secure storage is modelled as a string-to-string map. The
//! stores only ever write whole JSON documents under fixed keys; they never
//! read or write partial values.

use crate::domain::result::Result;

/// Key holding the JSON-encoded signed-in user
pub const USER_KEY: &str = "user";

/// Key holding the JSON-encoded product list
pub const PRODUCTS_KEY: &str = "products";

/// Key-value storage abstraction
///
/// Implementations (adapters) provide the actual storage. All calls are
/// blocking and run to completion; there is no cancellation and no timeout.
pub trait SecureStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if there is no entry
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the entry under `key`. Removing a missing key is not an error.
    fn delete_item(&self, key: &str) -> Result<()>;
}
