//! Typed access to the persisted documents
//!
//! The entity catalog and the session each live under one fixed key as a
//! single JSON blob. Reads swallow parse failures: a corrupt blob is
//! indistinguishable from an absent one, so the entity document falls back
//! to a fresh seed and the session reads as signed-out. There is no partial
//! state to recover.

use chrono::{Duration, Utc};

use whodini_core::{brand_digital_id, community_digital_id, id::new_id};

use crate::error::BackendError;
use crate::store::{
    BlobStore, Brand, Community, DummyDb, Event, Session, DB_KEY, SESSION_KEY,
};

/// Read the entity document; `None` if absent or corrupt
pub fn read_db<S: BlobStore>(store: &S) -> Result<Option<DummyDb>, BackendError> {
    let Some(raw) = store.get(DB_KEY)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(db) => Ok(Some(db)),
        Err(err) => {
            tracing::warn!(%err, "Discarding corrupt entity document");
            Ok(None)
        }
    }
}

/// Persist the whole entity document in one write
pub fn write_db<S: BlobStore>(store: &S, db: &DummyDb) -> Result<(), BackendError> {
    let raw = serde_json::to_string(db).map_err(|e| BackendError::Internal(e.to_string()))?;
    store.put(DB_KEY, &raw)
}

/// Get the entity document, seeding it on first access
pub fn require_db<S: BlobStore>(store: &S) -> Result<DummyDb, BackendError> {
    if let Some(db) = read_db(store)? {
        return Ok(db);
    }
    let db = seed_db();
    tracing::info!(
        brands = db.brands.len(),
        communities = db.communities.len(),
        events = db.events.len(),
        "Seeded entity document"
    );
    write_db(store, &db)?;
    Ok(db)
}

/// Read the current session; `None` if absent or corrupt
pub fn read_session<S: BlobStore>(store: &S) -> Result<Option<Session>, BackendError> {
    let Some(raw) = store.get(SESSION_KEY)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(session) => Ok(Some(session)),
        Err(err) => {
            tracing::warn!(%err, "Discarding corrupt session document");
            Ok(None)
        }
    }
}

/// Persist the session (clamping the active role index), or remove it
pub fn write_session<S: BlobStore>(
    store: &S,
    session: Option<&Session>,
) -> Result<(), BackendError> {
    match session {
        Some(session) => {
            let mut session = session.clone();
            session.clamp_active_role();
            let raw = serde_json::to_string(&session)
                .map_err(|e| BackendError::Internal(e.to_string()))?;
            store.put(SESSION_KEY, &raw)
        }
        None => store.remove(SESSION_KEY),
    }
}

/// Get the current session or fail as unauthenticated
pub fn require_session<S: BlobStore>(store: &S) -> Result<Session, BackendError> {
    read_session(store)?.ok_or(BackendError::NotSignedIn)
}

/// The fixed first-run catalog: browsable brands, communities, and events
/// with every relationship list empty
fn seed_db() -> DummyDb {
    let now = Utc::now();

    let brand = |name: &str, tagline: &str| Brand {
        id: new_id("brand"),
        digital_id: brand_digital_id(name),
        name: name.to_string(),
        tagline: tagline.to_string(),
        created_at: now,
    };

    let community = |name: &str, description: &str, approval_required: bool| Community {
        id: new_id("community"),
        digital_id: community_digital_id(name),
        name: name.to_string(),
        description: description.to_string(),
        approval_required,
        created_at: now,
    };

    let event = |name: &str, venue: &str, days_out: i64| Event {
        id: new_id("event"),
        name: name.to_string(),
        venue: venue.to_string(),
        starts_at: now + Duration::days(days_out),
        created_at: now,
    };

    DummyDb {
        brands: vec![
            brand("Lumen Roasters", "Small-batch coffee, roasted weekly"),
            brand("Patch & Thread", "Repairs and upcycled apparel"),
            brand("Harbor Audio", "Neighborhood hi-fi listening bar"),
        ],
        communities: vec![
            community(
                "Night Owls Run Club",
                "Easy-pace city runs, every Tuesday night",
                false,
            ),
            community(
                "Makers Guild",
                "Shared workshop access for members",
                true,
            ),
        ],
        events: vec![
            event("Open Studio Night", "Makers Guild Workshop", 7),
            event("Harborside Market", "Pier 4", 14),
        ],
        ..Default::default()
    }
}
