//! SQLite-backed credential store

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{CredentialStore, StoredUser};
use crate::error::BackendError;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Durable credential store backed by a SQLite file
pub struct SqliteCredentialStore {
    conn: Mutex<Connection>,
}

impl SqliteCredentialStore {
    /// Open or create a database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, BackendError> {
        let conn =
            Connection::open(path).map_err(|e| BackendError::Internal(e.to_string()))?;
        Self::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a throwaway in-memory database
    pub fn open_in_memory() -> Result<Self, BackendError> {
        let conn =
            Connection::open_in_memory().map_err(|e| BackendError::Internal(e.to_string()))?;
        Self::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run database migrations
    fn migrate(conn: &Connection) -> Result<(), BackendError> {
        let current_version = Self::get_schema_version(conn)?;

        if current_version < SCHEMA_VERSION {
            tracing::info!(
                current = current_version,
                target = SCHEMA_VERSION,
                "Running credential store migrations"
            );

            if current_version < 1 {
                Self::migrate_v1(conn)?;
            }

            conn.execute(
                "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
                params![SCHEMA_VERSION],
            )
            .map_err(|e| BackendError::Internal(e.to_string()))?;

            tracing::info!("Credential store migrations complete");
        }

        Ok(())
    }

    /// Get current schema version (0 if no schema exists)
    fn get_schema_version(conn: &Connection) -> Result<i32, BackendError> {
        let table_exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
                [],
                |row| row.get(0),
            )
            .map_err(|e| BackendError::Internal(e.to_string()))?;

        if !table_exists {
            return Ok(0);
        }

        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get::<_, Option<i32>>(0).map(|v| v.unwrap_or(0))
        })
        .map_err(|e| BackendError::Internal(e.to_string()))
    }

    /// Migration to version 1: initial schema
    fn migrate_v1(conn: &Connection) -> Result<(), BackendError> {
        conn.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- Registered users; account_types is a JSON array
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                created_at TEXT NOT NULL,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                account_types TEXT NOT NULL,
                password_salt TEXT NOT NULL,
                password_hash TEXT NOT NULL
            );
            CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email ON users(email);
            CREATE INDEX IF NOT EXISTS idx_users_created_at ON users(created_at);
            "#,
        )
        .map_err(|e| BackendError::Internal(e.to_string()))?;

        Ok(())
    }
}

impl CredentialStore for SqliteCredentialStore {
    fn insert(&self, user: StoredUser) -> Result<(), BackendError> {
        let conn = self.conn.lock().unwrap();
        let account_types = serde_json::to_string(&user.account_types)
            .map_err(|e| BackendError::Internal(e.to_string()))?;

        conn.execute(
            "INSERT INTO users (id, created_at, name, email, account_types, password_salt, password_hash)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user.id,
                user.created_at.to_rfc3339(),
                user.name,
                user.email.to_lowercase(),
                account_types,
                user.password_salt_b64,
                user.password_hash_b64,
            ],
        )
        .map_err(|e| {
            if let rusqlite::Error::SqliteFailure(ref err, _) = e {
                if err.code == rusqlite::ErrorCode::ConstraintViolation {
                    return BackendError::EmailTaken;
                }
            }
            BackendError::Internal(e.to_string())
        })?;

        Ok(())
    }

    fn get_by_email(&self, email: &str) -> Result<Option<StoredUser>, BackendError> {
        let normalized = email.to_lowercase();
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            "SELECT id, created_at, name, email, account_types, password_salt, password_hash
             FROM users WHERE email = ?1",
            params![normalized],
            |row| {
                let id: String = row.get(0)?;
                let created_at: String = row.get(1)?;
                let name: String = row.get(2)?;
                let email: String = row.get(3)?;
                let account_types: String = row.get(4)?;
                let password_salt_b64: String = row.get(5)?;
                let password_hash_b64: String = row.get(6)?;
                Ok(StoredUser {
                    id,
                    created_at: DateTime::parse_from_rfc3339(&created_at)
                        .map(|dt| dt.with_timezone(&Utc))
                        .unwrap_or_else(|_| Utc::now()),
                    name,
                    email,
                    account_types: serde_json::from_str(&account_types).unwrap_or_default(),
                    password_salt_b64,
                    password_hash_b64,
                })
            },
        )
        .optional()
        .map_err(|e| BackendError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whodini_core::AccountType;

    fn stored(email: &str) -> StoredUser {
        StoredUser {
            id: whodini_core::id::new_id("user"),
            created_at: Utc::now(),
            name: "A".to_string(),
            email: email.to_string(),
            account_types: vec![AccountType::Personal],
            password_salt_b64: "c2FsdA==".to_string(),
            password_hash_b64: "aGFzaA==".to_string(),
        }
    }

    #[test]
    fn test_insert_and_lookup_round_trip() {
        let store = SqliteCredentialStore::open_in_memory().unwrap();
        let user = stored("a@b.com");
        store.insert(user.clone()).unwrap();

        let found = store.get_by_email("A@B.com").unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.email, "a@b.com");
        assert_eq!(found.account_types, vec![AccountType::Personal]);
        assert_eq!(found.password_salt_b64, user.password_salt_b64);
    }

    #[test]
    fn test_unique_email_index_rejects_duplicates() {
        let store = SqliteCredentialStore::open_in_memory().unwrap();
        store.insert(stored("a@b.com")).unwrap();
        assert!(matches!(
            store.insert(stored("A@B.COM")),
            Err(BackendError::EmailTaken)
        ));
    }

    #[test]
    fn test_missing_email_reads_none() {
        let store = SqliteCredentialStore::open_in_memory().unwrap();
        assert!(store.get_by_email("missing@b.com").unwrap().is_none());
    }
}
