//! Entity id generation
//!
//! Every entity id is `<prefix>_<uuid>`. The prefix names the list the
//! entity lives in (`brand`, `community`, `sub`, ...) so ids stay readable
//! in logs and stored documents.

use uuid::Uuid;

/// Generate a new entity id with the given prefix
pub fn new_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4())
}
