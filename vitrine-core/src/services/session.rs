//! Session service - the signed-in identity
//!
//! Holds the current user in memory and mirrors it under the `"user"` key.
//! Credentials are checked against an in-memory account list seeded with
//! the known accounts; registration appends to that list for the lifetime
//! of the service only.
//!
//! Storage failures never surface to callers: they are logged and the
//! in-memory identity is kept.

use std::sync::Arc;

use crate::adapters::seed::seed_credentials;
use crate::domain::id::generate_id;
use crate::domain::{Credential, User};
use crate::ports::{SecureStore, USER_KEY};
use crate::services::persisted::PersistedEntry;

pub struct SessionService {
    entry: PersistedEntry<User>,
    credentials: Vec<Credential>,
    user: Option<User>,
    ready: bool,
}

impl SessionService {
    /// Session service over `store` with the seeded account list
    pub fn new(store: Arc<dyn SecureStore>) -> Self {
        Self::with_credentials(store, seed_credentials())
    }

    pub fn with_credentials(store: Arc<dyn SecureStore>, credentials: Vec<Credential>) -> Self {
        Self {
            entry: PersistedEntry::new(store, USER_KEY),
            credentials,
            user: None,
            ready: false,
        }
    }

    /// Restore the persisted identity, if any, and mark the session ready.
    ///
    /// A missing or unreadable entry leaves the session signed out. Only the
    /// first call does anything.
    pub fn initialize(&mut self) {
        if self.ready {
            return;
        }
        match self.entry.load() {
            Ok(user) => self.user = user,
            Err(e) => tracing::error!("Failed to restore session: {}", e),
        }
        self.ready = true;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Sign in with a known account. Returns false when no account matches.
    pub fn login(&mut self, email: &str, password: &str) -> bool {
        let user = match self
            .credentials
            .iter()
            .find(|c| c.email == email && c.verify(password))
        {
            Some(credential) => credential.to_user(),
            None => {
                tracing::debug!("login rejected");
                return false;
            }
        };

        self.set_user(user);
        true
    }

    /// Create an account and sign in as it.
    ///
    /// Returns false when the email already belongs to a known account.
    pub fn register(&mut self, email: &str, password: &str, name: &str) -> bool {
        if self.credentials.iter().any(|c| c.email == email) {
            return false;
        }

        let credential = match Credential::new(generate_id(), email, name, password) {
            Ok(credential) => credential,
            Err(e) => {
                tracing::error!("Failed to create account: {}", e);
                return false;
            }
        };
        let user = credential.to_user();
        self.credentials.push(credential);
        self.set_user(user);
        true
    }

    /// Forget the identity in memory and in storage
    pub fn logout(&mut self) {
        self.user = None;
        if let Err(e) = self.entry.clear() {
            tracing::error!("Failed to clear session: {}", e);
        }
    }

    /// Change the name and email of the signed-in user.
    ///
    /// The account list is left as is, so a later login still uses the
    /// original email. Returns false when nobody is signed in.
    pub fn update_profile(&mut self, name: &str, email: &str) -> bool {
        let Some(current) = &self.user else {
            return false;
        };
        let updated = User {
            name: name.to_string(),
            email: email.to_string(),
            ..current.clone()
        };
        self.set_user(updated);
        true
    }

    fn set_user(&mut self, user: User) {
        if let Err(e) = self.entry.save(&user) {
            tracing::error!("Failed to persist session: {}", e);
        }
        self.user = Some(user);
    }
}
