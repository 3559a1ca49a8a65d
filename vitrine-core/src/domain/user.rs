//! User domain model

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// The signed-in identity, as persisted under the `"user"` key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl User {
    pub fn new(id: impl Into<String>, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
        }
    }
}

/// A known account that can log in.
///
/// Credentials live in memory only. The password is kept as an Argon2id
/// PHC string.
#[derive(Debug, Clone)]
pub struct Credential {
    pub id: String,
    pub email: String,
    pub name: String,
    password_hash: String,
}

impl Credential {
    /// Create a credential, hashing the plaintext password
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
        password: &str,
    ) -> Result<Self> {
        Ok(Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            password_hash: hash_password(password)?,
        })
    }

    /// Credential over an existing Argon2 PHC string
    pub fn from_hash(
        id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            password_hash: password_hash.into(),
        }
    }

    /// Check a plaintext password against the stored hash
    pub fn verify(&self, password: &str) -> bool {
        match PasswordHash::new(&self.password_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Public projection, without the password
    pub fn to_user(&self) -> User {
        User::new(&self.id, &self.email, &self.name)
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Other(format!("Failed to hash password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_json_shape() {
        let user = User::new("1", "test@example.com", "John Doe");
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "1", "email": "test@example.com", "name": "John Doe"})
        );
    }

    #[test]
    fn test_credential_verifies_password() {
        let cred = Credential::new("1", "test@example.com", "John Doe", "password123").unwrap();
        assert!(cred.verify("password123"));
        assert!(!cred.verify("wrong"));
        assert!(!cred.verify(""));
    }

    #[test]
    fn test_credential_from_stored_hash() {
        let hashed = Credential::new("1", "test@example.com", "John Doe", "password123").unwrap();
        let cred = Credential::from_hash("1", "test@example.com", "John Doe", hashed.password_hash);
        assert!(cred.verify("password123"));
        assert!(!cred.verify("password124"));

        let broken = Credential::from_hash("3", "x@example.com", "X", "not a phc string");
        assert!(!broken.verify("anything"));
    }

    #[test]
    fn test_credential_projection_drops_password() {
        let cred = Credential::new("2", "admin@example.com", "Admin User", "admin123").unwrap();
        let user = cred.to_user();
        assert_eq!(user, User::new("2", "admin@example.com", "Admin User"));
    }
}
