//! Local credential store
//!
//! A durable table of registered users with salted password hashes,
//! independent of the session/entity store. Nothing in the session API
//! consults it: registering here does not sign anybody in, mirroring the
//! product prototype this backend stands in for.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryCredentialStore;
pub use sqlite::SqliteCredentialStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use whodini_core::{hash_password, id::new_id, verify_password, AccountType, SaltedHash};

use crate::error::BackendError;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// A stored credential record; salt and hash are base64 strings so the
/// record stays JSON-serializable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub account_types: Vec<AccountType>,
    pub password_salt_b64: String,
    pub password_hash_b64: String,
}

/// Public projection of a stored user, without credential material
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalUser {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub account_types: Vec<AccountType>,
}

impl From<StoredUser> for LocalUser {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at,
            name: user.name,
            email: user.email,
            account_types: user.account_types,
        }
    }
}

/// Trait for credential storage
pub trait CredentialStore: Send + Sync {
    /// Insert a new user; fails with the duplicate-email error if the
    /// (normalized) email is already registered
    fn insert(&self, user: StoredUser) -> Result<(), BackendError>;

    /// Look up a user by email, normalized by the store
    fn get_by_email(&self, email: &str) -> Result<Option<StoredUser>, BackendError>;
}

/// Input for `create_user`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub account_types: Vec<AccountType>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate, hash, and store a new user
pub fn create_user<C: CredentialStore>(
    store: &C,
    input: NewUser,
) -> Result<LocalUser, BackendError> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(BackendError::Validation("Name is required".to_string()));
    }
    let email = normalize_email(&input.email);
    if email.is_empty() {
        return Err(BackendError::Validation("Email is required".to_string()));
    }
    if input.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(BackendError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    if !input.account_types.contains(&AccountType::Personal) {
        return Err(BackendError::Validation(
            "A personal account type is required".to_string(),
        ));
    }

    // Check-then-insert leaves a race window; this process is the only
    // writer and the store's unique index backstops it.
    if store.get_by_email(&email)?.is_some() {
        return Err(BackendError::EmailTaken);
    }

    let SaltedHash { salt_b64, hash_b64 } = hash_password(&input.password);
    let user = StoredUser {
        id: new_id("user"),
        created_at: Utc::now(),
        name,
        email,
        account_types: input.account_types,
        password_salt_b64: salt_b64,
        password_hash_b64: hash_b64,
    };
    store.insert(user.clone())?;
    tracing::debug!(email = %user.email, "Registered local user");
    Ok(user.into())
}

/// Authenticate against the stored hash
///
/// One generic error covers both an unknown email and a wrong password.
pub fn sign_in_with_email_password<C: CredentialStore>(
    store: &C,
    email: &str,
    password: &str,
) -> Result<LocalUser, BackendError> {
    let user = store
        .get_by_email(&normalize_email(email))?
        .ok_or(BackendError::InvalidCredentials)?;

    let stored = SaltedHash {
        salt_b64: user.password_salt_b64.clone(),
        hash_b64: user.password_hash_b64.clone(),
    };
    let valid =
        verify_password(password, &stored).map_err(|e| BackendError::Internal(e.to_string()))?;
    if !valid {
        return Err(BackendError::InvalidCredentials);
    }

    Ok(user.into())
}

/// Look up the public projection of a registered user
pub fn get_user_by_email<C: CredentialStore>(
    store: &C,
    email: &str,
) -> Result<Option<LocalUser>, BackendError> {
    Ok(store
        .get_by_email(&normalize_email(email))?
        .map(LocalUser::from))
}
