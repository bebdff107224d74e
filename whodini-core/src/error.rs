//! Error types for whodini-core

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Unknown account type: {0}")]
    UnknownAccountType(String),
}
