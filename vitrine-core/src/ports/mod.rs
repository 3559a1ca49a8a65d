//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

mod secure_store;

pub use secure_store::{SecureStore, PRODUCTS_KEY, USER_KEY};
