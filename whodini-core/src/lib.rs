//! Whodini Core Library
//!
//! Shared primitives for the Whodini digital-identity product:
//! - Account types and their wire encoding
//! - Entity id generation and digital-id derivation for organizations
//! - Salted password hashing for the local credential store

pub mod account;
pub mod digital;
pub mod error;
pub mod id;
pub mod password;

pub use account::AccountType;
pub use digital::{brand_digital_id, community_digital_id};
pub use error::Error;
pub use password::{hash_password, verify_password, SaltedHash};

/// Result type for whodini-core operations
pub type Result<T> = std::result::Result<T, Error>;
