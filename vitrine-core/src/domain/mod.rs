//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod backup;
mod encryption;
pub mod id;
mod product;
pub mod result;
mod user;
pub mod validation;

pub use backup::BackupMetadata;
pub use encryption::{Argon2Params, EncryptionMetadata, EncryptionStatus};
pub use product::{
    NewProduct, Product, ProductPatch, ALL_CATEGORIES, DEFAULT_PRODUCT_IMAGE, PRODUCT_CATEGORIES,
};
pub use user::{Credential, User};
