//! Identity store: username -> user mapping.
//!
//! Users are created on first login and never change afterwards. The
//! registry is one JSON document; first-login creation runs under the
//! registry lock so two concurrent logins for the same username cannot
//! both insert — the loser re-reads and returns the winner's row.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::id::IdGenerator;
use crate::storage::Storage;

/// A registered user. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// On-disk registry of all users, keyed by username.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRegistry {
    pub users: Vec<User>,
}

impl UserRegistry {
    /// Case-sensitive lookup, matching how usernames are stored.
    pub fn find(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|user| user.username == username)
    }

    pub fn find_by_id(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|user| user.id == user_id)
    }
}

#[derive(Clone)]
pub struct IdentityStore {
    storage: Storage,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl IdentityStore {
    pub fn new(storage: Storage, ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            ids,
            clock,
        }
    }

    /// Look up a username, creating the user on first login.
    ///
    /// Repeated logins for the same username always return the same row.
    pub fn login(&self, username: &str) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::Validation("username cannot be empty".to_string()));
        }

        // Fast path: an existing user needs no lock, the registry is
        // only ever appended to.
        if let Some(user) = self.find_by_username(username)? {
            return Ok(user);
        }

        let _lock = self.storage.lock_registry()?;

        // Re-read under the lock; a concurrent first login may have won.
        let mut registry = self.load_registry()?;
        if let Some(user) = registry.find(username) {
            return Ok(user.clone());
        }

        let user = User {
            id: self.ids.generate(),
            username: username.to_string(),
            created_at: self.clock.now(),
        };
        registry.users.push(user.clone());
        self.storage.write_json(&self.storage.users_file(), &registry)?;

        Ok(user)
    }

    /// Resolve a user id back to its row.
    pub fn find_user(&self, user_id: &str) -> Result<Option<User>> {
        let registry = self.load_registry()?;
        Ok(registry.find_by_id(user_id).cloned())
    }

    /// Pure read by username; `None` if the user has never logged in.
    pub fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let registry = self.load_registry()?;
        Ok(registry.find(username).cloned())
    }

    fn load_registry(&self) -> Result<UserRegistry> {
        Ok(self
            .storage
            .read_json(&self.storage.users_file())?
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::id::SequentialIdGenerator;
    use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;
    use tempfile::TempDir;

    fn store(temp: &TempDir) -> IdentityStore {
        let storage = Storage::new(temp.path().to_path_buf(), DEFAULT_LOCK_TIMEOUT_MS);
        IdentityStore::new(
            storage,
            Arc::new(SequentialIdGenerator::new("user")),
            Arc::new(FixedClock::on_day("2024-01-01".parse().unwrap())),
        )
    }

    #[test]
    fn first_login_creates_user() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);

        let user = store.login("alice").unwrap();
        assert_eq!(user.id, "user-1");
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn repeated_logins_return_same_id() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);

        let first = store.login("alice").unwrap();
        let second = store.login("alice").unwrap();
        let third = store.login("alice").unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.id, third.id);
    }

    #[test]
    fn usernames_are_case_sensitive() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);

        let lower = store.login("alice").unwrap();
        let upper = store.login("Alice").unwrap();
        assert_ne!(lower.id, upper.id);
    }

    #[test]
    fn empty_or_whitespace_username_rejected() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);

        assert!(matches!(store.login(""), Err(Error::Validation(_))));
        assert!(matches!(store.login("   "), Err(Error::Validation(_))));
    }

    #[test]
    fn username_is_trimmed_before_lookup() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);

        let created = store.login("alice").unwrap();
        let padded = store.login("  alice  ").unwrap();
        assert_eq!(created.id, padded.id);
    }

    #[test]
    fn find_user_resolves_id() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);

        let user = store.login("alice").unwrap();
        let found = store.find_user(&user.id).unwrap().expect("user");
        assert_eq!(found, user);

        assert!(store.find_user("missing").unwrap().is_none());
    }
}
