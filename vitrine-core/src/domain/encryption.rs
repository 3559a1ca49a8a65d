//! Encryption domain models for the secure store database

use serde::{Deserialize, Serialize};

/// Default Argon2id parameters
pub const DEFAULT_TIME_COST: u32 = 3;
pub const DEFAULT_MEMORY_COST: u32 = 65536; // 64 MiB
pub const DEFAULT_PARALLELISM: u32 = 4;
pub const DEFAULT_HASH_LEN: u32 = 32;

/// Argon2id parameters for key derivation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argon2Params {
    pub time_cost: u32,
    pub memory_cost: u32,
    pub parallelism: u32,
    pub hash_len: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            time_cost: DEFAULT_TIME_COST,
            memory_cost: DEFAULT_MEMORY_COST,
            parallelism: DEFAULT_PARALLELISM,
            hash_len: DEFAULT_HASH_LEN,
        }
    }
}

/// Contents of encryption.json, written next to the store database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptionMetadata {
    pub encrypted: bool,
    /// Base64-encoded random salt
    pub salt: String,
    pub algorithm: String,
    pub version: u32,
    pub argon2_params: Argon2Params,
}

impl EncryptionMetadata {
    pub fn new_encrypted(salt: String, argon2_params: Argon2Params) -> Self {
        Self {
            encrypted: true,
            salt,
            algorithm: "argon2id".to_string(),
            version: 1,
            argon2_params,
        }
    }
}

/// Status of store encryption for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptionStatus {
    pub encrypted: bool,
    pub algorithm: Option<String>,
    pub version: Option<u32>,
}

impl EncryptionStatus {
    pub fn unencrypted() -> Self {
        Self {
            encrypted: false,
            algorithm: None,
            version: None,
        }
    }

    pub fn from_metadata(meta: &EncryptionMetadata) -> Self {
        Self {
            encrypted: meta.encrypted,
            algorithm: Some(meta.algorithm.clone()),
            version: Some(meta.version),
        }
    }
}
