//! Application state for the HTTP surface

use crate::credentials::CredentialStore;
use crate::store::BlobStore;

/// The two independent stores the backend serves from
pub struct AppState<B, C> {
    pub blob_store: B,
    pub credential_store: C,
}

impl<B: BlobStore, C: CredentialStore> AppState<B, C> {
    pub fn new(blob_store: B, credential_store: C) -> Self {
        Self {
            blob_store,
            credential_store,
        }
    }
}
