//! Whodini Local Backend
//!
//! A runnable stand-in for the Whodini SaaS backend. All state lives in
//! local stores: a JSON document store holding the entity catalog and the
//! current session, and an independent SQLite credential table with salted
//! password hashes. The HTTP surface exposes every operation the front end
//! needs, so UI work can proceed against realistic flows without a real
//! backend.
//!
//! The two persistence paths are deliberately disconnected, as in the
//! product prototype: session sign-in never consults the credential table.

pub mod api;
pub mod config;
pub mod credentials;
pub mod error;
pub mod routes;
pub mod state;
pub mod storage;
pub mod store;

pub use config::Config;
pub use credentials::{
    CredentialStore, InMemoryCredentialStore, LocalUser, SqliteCredentialStore, StoredUser,
};
pub use error::BackendError;
pub use state::AppState;
pub use store::{BlobStore, FileBlobStore, InMemoryBlobStore};
