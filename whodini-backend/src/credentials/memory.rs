//! In-memory credential store

use std::collections::HashMap;
use std::sync::RwLock;

use super::{CredentialStore, StoredUser};
use crate::error::BackendError;

/// In-memory credential store, keyed by normalized email (the unique index)
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<String, StoredUser>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn insert(&self, user: StoredUser) -> Result<(), BackendError> {
        let key = user.email.to_lowercase();
        let mut users = self.users.write().unwrap();
        if users.contains_key(&key) {
            return Err(BackendError::EmailTaken);
        }
        users.insert(key, user);
        Ok(())
    }

    fn get_by_email(&self, email: &str) -> Result<Option<StoredUser>, BackendError> {
        let normalized = email.to_lowercase();
        Ok(self.users.read().unwrap().get(&normalized).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn stored(email: &str) -> StoredUser {
        StoredUser {
            id: format!("user_{}", email),
            created_at: Utc::now(),
            name: "A".to_string(),
            email: email.to_string(),
            account_types: vec![],
            password_salt_b64: String::new(),
            password_hash_b64: String::new(),
        }
    }

    #[test]
    fn test_insert_and_lookup() {
        let store = InMemoryCredentialStore::new();
        store.insert(stored("a@b.com")).unwrap();

        let user = store.get_by_email("A@B.com").unwrap();
        assert!(user.is_some());
        assert!(store.get_by_email("x@y.com").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let store = InMemoryCredentialStore::new();
        store.insert(stored("a@b.com")).unwrap();
        assert!(matches!(
            store.insert(stored("A@B.COM")),
            Err(BackendError::EmailTaken)
        ));
    }
}
