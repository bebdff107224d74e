//! Password hashing for the local credential store
//!
//! A 16-byte random salt is concatenated with the UTF-8 password bytes and
//! hashed with a single SHA-256 pass; salt and hash travel base64-encoded so
//! stored records stay plain JSON-serializable strings. This is the
//! prototype's scheme, kept as-is: no iteration count, no memory-hardness.
//! Anything holding real credentials must replace it with a proper KDF.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::Result;

/// Salt length in bytes
pub const SALT_LEN: usize = 16;

/// A salted password hash with base64-encoded fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaltedHash {
    pub salt_b64: String,
    pub hash_b64: String,
}

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> SaltedHash {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let hash = digest(&salt, password);
    SaltedHash {
        salt_b64: STANDARD.encode(salt),
        hash_b64: STANDARD.encode(hash),
    }
}

/// Verify a password against a stored salt/hash pair
///
/// Errors only if the stored fields are not valid base64; a wrong password
/// is `Ok(false)`.
pub fn verify_password(password: &str, stored: &SaltedHash) -> Result<bool> {
    let salt = STANDARD.decode(&stored.salt_b64)?;
    let expected = STANDARD.decode(&stored.hash_b64)?;
    let actual = digest(&salt, password);
    Ok(constant_time_eq(&actual, &expected))
}

fn digest(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

/// Compare two digests without short-circuiting on the first mismatch.
/// The up-front length check still leaks length, which is moot for
/// fixed-width digests.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut acc = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        acc |= x ^ y;
    }
    acc == 0
}
