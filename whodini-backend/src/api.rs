//! Data-access API over the document store
//!
//! Every operation reads whole documents, computes in memory, and persists
//! whole documents in one write, so each call is atomic with respect to
//! other calls through the same store instance. Operations that act as a
//! user require a session first; catalog reads seed the entity document on
//! first access.
//!
//! `sign_in` never checks a password: the backend fabricates a session for
//! any email. The credential table in `crate::credentials` is a separate
//! subsystem and is not consulted here.

use chrono::Utc;
use serde::Deserialize;

use whodini_core::{brand_digital_id, community_digital_id, id::new_id, AccountType};

use crate::error::BackendError;
use crate::storage::{read_session, require_db, require_session, write_db, write_session};
use crate::store::{
    BlobStore, Brand, BrandSubscription, Community, CommunityMembership, Event,
    EventRegistration, MembershipStatus, Role, Session, UserCommunityMessage, UserNotification,
};

/// Fallback title for blank broadcasts
const DEFAULT_TITLE: &str = "Untitled";
/// Fallback body for blank broadcasts
const DEFAULT_MESSAGE: &str = "(no message)";

/// Sign-up input, tagged by account type
///
/// Business and community sign-ups synthesize the corresponding entity;
/// organizer and agency sign-ups only add a role to the session.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "accountType", rename_all = "lowercase")]
pub enum SignUpInput {
    #[serde(rename_all = "camelCase")]
    Personal { email: String, display_name: String },
    #[serde(rename_all = "camelCase")]
    Business {
        email: String,
        display_name: String,
        business_name: String,
    },
    #[serde(rename_all = "camelCase")]
    Community {
        email: String,
        display_name: String,
        community_name: String,
        #[serde(default)]
        approval_required: bool,
    },
    #[serde(rename_all = "camelCase")]
    Organizer {
        email: String,
        display_name: String,
        organization_name: String,
    },
    #[serde(rename_all = "camelCase")]
    Agency {
        email: String,
        display_name: String,
        agency_name: String,
    },
}

impl SignUpInput {
    fn email(&self) -> &str {
        match self {
            SignUpInput::Personal { email, .. }
            | SignUpInput::Business { email, .. }
            | SignUpInput::Community { email, .. }
            | SignUpInput::Organizer { email, .. }
            | SignUpInput::Agency { email, .. } => email,
        }
    }

    fn display_name(&self) -> &str {
        match self {
            SignUpInput::Personal { display_name, .. }
            | SignUpInput::Business { display_name, .. }
            | SignUpInput::Community { display_name, .. }
            | SignUpInput::Organizer { display_name, .. }
            | SignUpInput::Agency { display_name, .. } => display_name,
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Add a personal role if the session has none
fn ensure_personal_role(session: &mut Session) {
    let has_personal = session
        .roles
        .iter()
        .any(|r| r.account_type == AccountType::Personal);
    if !has_personal {
        session.roles.insert(
            0,
            Role {
                account_type: AccountType::Personal,
                account_id: session.user_id.clone(),
                label: session.display_name.clone(),
            },
        );
    }
}

fn required(value: &str, what: &str) -> Result<String, BackendError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BackendError::Validation(format!("{} is required", what)));
    }
    Ok(trimmed.to_string())
}

/// Create or extend the session for `input`, synthesizing org entities as
/// needed. The resulting session always holds a personal role; org sign-ups
/// leave the new org role active.
pub fn sign_up<S: BlobStore>(store: &S, input: SignUpInput) -> Result<Session, BackendError> {
    let email = normalize_email(input.email());
    if email.is_empty() {
        return Err(BackendError::Validation("Email is required".to_string()));
    }
    let display_name = required(input.display_name(), "Display name")?;

    // Extend the current session only when it belongs to the same email;
    // otherwise this sign-up replaces it (the store holds one session).
    let mut session = match read_session(store)? {
        Some(existing) if existing.email == email => existing,
        _ => Session {
            user_id: new_id("user"),
            email: email.clone(),
            display_name: display_name.clone(),
            roles: Vec::new(),
            active_role_index: 0,
        },
    };

    ensure_personal_role(&mut session);

    match input {
        SignUpInput::Personal { .. } => {
            let idx = session
                .roles
                .iter()
                .position(|r| r.account_type == AccountType::Personal)
                .unwrap_or(0);
            session.active_role_index = idx;
        }
        SignUpInput::Business { business_name, .. } => {
            let name = required(&business_name, "Business name")?;
            let mut db = require_db(store)?;
            let brand = Brand {
                id: new_id("brand"),
                digital_id: brand_digital_id(&name),
                name: name.clone(),
                tagline: String::new(),
                created_at: Utc::now(),
            };
            session.roles.push(Role {
                account_type: AccountType::Business,
                account_id: brand.id.clone(),
                label: name,
            });
            db.brands.insert(0, brand);
            write_db(store, &db)?;
            session.active_role_index = session.roles.len() - 1;
        }
        SignUpInput::Community {
            community_name,
            approval_required,
            ..
        } => {
            let name = required(&community_name, "Community name")?;
            let mut db = require_db(store)?;
            let community = Community {
                id: new_id("community"),
                digital_id: community_digital_id(&name),
                name: name.clone(),
                description: String::new(),
                approval_required,
                created_at: Utc::now(),
            };
            session.roles.push(Role {
                account_type: AccountType::Community,
                account_id: community.id.clone(),
                label: name,
            });
            db.communities.insert(0, community);
            write_db(store, &db)?;
            session.active_role_index = session.roles.len() - 1;
        }
        SignUpInput::Organizer {
            organization_name, ..
        } => {
            let name = required(&organization_name, "Organization name")?;
            session.roles.push(Role {
                account_type: AccountType::Organizer,
                account_id: session.user_id.clone(),
                label: name,
            });
            session.active_role_index = session.roles.len() - 1;
        }
        SignUpInput::Agency { agency_name, .. } => {
            let name = required(&agency_name, "Agency name")?;
            session.roles.push(Role {
                account_type: AccountType::Agency,
                account_id: session.user_id.clone(),
                label: name,
            });
            session.active_role_index = session.roles.len() - 1;
        }
    }

    write_session(store, Some(&session))?;
    tracing::debug!(email = %session.email, roles = session.roles.len(), "Signed up");
    Ok(session)
}

/// Sign in by email alone
///
/// Returns the existing session unchanged when its email matches; otherwise
/// fabricates a fresh session with a single personal role labeled with the
/// email's local part. No password is involved.
pub fn sign_in<S: BlobStore>(store: &S, email: &str) -> Result<Session, BackendError> {
    let email = normalize_email(email);
    if email.is_empty() {
        return Err(BackendError::Validation("Email is required".to_string()));
    }

    if let Some(existing) = read_session(store)? {
        if existing.email == email {
            return Ok(existing);
        }
    }

    let display_name = email
        .split('@')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(email.as_str())
        .to_string();
    let user_id = new_id("user");
    let session = Session {
        user_id: user_id.clone(),
        email,
        display_name: display_name.clone(),
        roles: vec![Role {
            account_type: AccountType::Personal,
            account_id: user_id,
            label: display_name,
        }],
        active_role_index: 0,
    };
    write_session(store, Some(&session))?;
    tracing::debug!(email = %session.email, "Signed in");
    Ok(session)
}

/// Remove the persisted session
pub fn sign_out<S: BlobStore>(store: &S) -> Result<(), BackendError> {
    write_session(store, None)
}

/// The current session, if any
pub fn current_session<S: BlobStore>(store: &S) -> Result<Option<Session>, BackendError> {
    read_session(store)
}

/// Switch the active role, clamping out-of-range indexes
pub fn set_active_role_index<S: BlobStore>(
    store: &S,
    index: usize,
) -> Result<Session, BackendError> {
    let mut session = require_session(store)?;
    session.active_role_index = index;
    session.clamp_active_role();
    write_session(store, Some(&session))?;
    Ok(session)
}

pub fn list_brands<S: BlobStore>(store: &S) -> Result<Vec<Brand>, BackendError> {
    Ok(require_db(store)?.brands)
}

pub fn list_communities<S: BlobStore>(store: &S) -> Result<Vec<Community>, BackendError> {
    Ok(require_db(store)?.communities)
}

pub fn list_events<S: BlobStore>(store: &S) -> Result<Vec<Event>, BackendError> {
    Ok(require_db(store)?.events)
}

/// Subscribe the current user to a brand; idempotent per (user, brand)
pub fn subscribe_to_brand<S: BlobStore>(
    store: &S,
    brand_id: &str,
) -> Result<BrandSubscription, BackendError> {
    let session = require_session(store)?;
    let mut db = require_db(store)?;
    if !db.brands.iter().any(|b| b.id == brand_id) {
        return Err(BackendError::NotFound("Brand"));
    }
    if let Some(existing) = db
        .subscriptions
        .iter()
        .find(|s| s.user_id == session.user_id && s.brand_id == brand_id)
    {
        return Ok(existing.clone());
    }

    let subscription = BrandSubscription {
        id: new_id("sub"),
        user_id: session.user_id,
        brand_id: brand_id.to_string(),
        subscribed_at: Utc::now(),
    };
    db.subscriptions.insert(0, subscription.clone());
    write_db(store, &db)?;
    Ok(subscription)
}

/// Join a community; idempotent per (user, community). The membership
/// starts `pending` when the community requires approval, else `active`.
pub fn join_community<S: BlobStore>(
    store: &S,
    community_id: &str,
) -> Result<CommunityMembership, BackendError> {
    let session = require_session(store)?;
    let mut db = require_db(store)?;
    let approval_required = db
        .communities
        .iter()
        .find(|c| c.id == community_id)
        .ok_or(BackendError::NotFound("Community"))?
        .approval_required;
    if let Some(existing) = db
        .memberships
        .iter()
        .find(|m| m.user_id == session.user_id && m.community_id == community_id)
    {
        return Ok(existing.clone());
    }

    let status = if approval_required {
        MembershipStatus::Pending
    } else {
        MembershipStatus::Active
    };
    let membership = CommunityMembership {
        id: new_id("mem"),
        user_id: session.user_id,
        community_id: community_id.to_string(),
        status,
        joined_at: Utc::now(),
    };
    db.memberships.insert(0, membership.clone());
    write_db(store, &db)?;
    tracing::debug!(status = status.as_str(), "Joined community");
    Ok(membership)
}

/// Register the current user for an event; idempotent per (user, event)
pub fn register_for_event<S: BlobStore>(
    store: &S,
    event_id: &str,
) -> Result<EventRegistration, BackendError> {
    let session = require_session(store)?;
    let mut db = require_db(store)?;
    if !db.events.iter().any(|e| e.id == event_id) {
        return Err(BackendError::NotFound("Event"));
    }
    if let Some(existing) = db
        .registrations
        .iter()
        .find(|r| r.user_id == session.user_id && r.event_id == event_id)
    {
        return Ok(existing.clone());
    }

    let registration = EventRegistration {
        id: new_id("reg"),
        user_id: session.user_id,
        event_id: event_id.to_string(),
        registered_at: Utc::now(),
    };
    db.registrations.insert(0, registration.clone());
    write_db(store, &db)?;
    Ok(registration)
}

fn broadcast_text(title: &str, message: &str) -> (String, String) {
    let title = title.trim();
    let message = message.trim();
    (
        if title.is_empty() { DEFAULT_TITLE } else { title }.to_string(),
        if message.is_empty() { DEFAULT_MESSAGE } else { message }.to_string(),
    )
}

/// Fan a notification out to every subscriber of a brand
///
/// One row per subscriber, all sharing a single timestamp. Returns the
/// created rows.
pub fn create_brand_notification<S: BlobStore>(
    store: &S,
    brand_id: &str,
    title: &str,
    message: &str,
) -> Result<Vec<UserNotification>, BackendError> {
    require_session(store)?;
    let mut db = require_db(store)?;
    if !db.brands.iter().any(|b| b.id == brand_id) {
        return Err(BackendError::NotFound("Brand"));
    }

    let (title, message) = broadcast_text(title, message);
    let now = Utc::now();
    let rows: Vec<UserNotification> = db
        .subscriptions
        .iter()
        .filter(|s| s.brand_id == brand_id)
        .map(|s| UserNotification {
            id: new_id("ntf"),
            user_id: s.user_id.clone(),
            from_brand_id: brand_id.to_string(),
            title: title.clone(),
            message: message.clone(),
            created_at: now,
        })
        .collect();

    for row in rows.iter().rev() {
        db.notifications.insert(0, row.clone());
    }
    write_db(store, &db)?;
    tracing::debug!(recipients = rows.len(), "Broadcast brand notification");
    Ok(rows)
}

/// Fan an announcement out to every **active** member of a community
pub fn create_community_announcement<S: BlobStore>(
    store: &S,
    community_id: &str,
    title: &str,
    message: &str,
) -> Result<Vec<UserCommunityMessage>, BackendError> {
    require_session(store)?;
    let mut db = require_db(store)?;
    if !db.communities.iter().any(|c| c.id == community_id) {
        return Err(BackendError::NotFound("Community"));
    }

    let (title, message) = broadcast_text(title, message);
    let now = Utc::now();
    let rows: Vec<UserCommunityMessage> = db
        .memberships
        .iter()
        .filter(|m| m.community_id == community_id && m.status == MembershipStatus::Active)
        .map(|m| UserCommunityMessage {
            id: new_id("msg"),
            user_id: m.user_id.clone(),
            from_community_id: community_id.to_string(),
            title: title.clone(),
            message: message.clone(),
            created_at: now,
            read_at: None,
        })
        .collect();

    for row in rows.iter().rev() {
        db.community_messages.insert(0, row.clone());
    }
    write_db(store, &db)?;
    tracing::debug!(recipients = rows.len(), "Broadcast community announcement");
    Ok(rows)
}

/// Flip a pending membership to active
///
/// No-op (returning the unchanged row) when already active; `None` for an
/// unknown id.
pub fn approve_membership<S: BlobStore>(
    store: &S,
    membership_id: &str,
) -> Result<Option<CommunityMembership>, BackendError> {
    require_session(store)?;
    let mut db = require_db(store)?;
    let Some(membership) = db.memberships.iter_mut().find(|m| m.id == membership_id) else {
        return Ok(None);
    };
    if membership.status == MembershipStatus::Active {
        return Ok(Some(membership.clone()));
    }
    membership.status = MembershipStatus::Active;
    let approved = membership.clone();
    write_db(store, &db)?;
    Ok(Some(approved))
}

/// Mark one of the calling user's community messages read
///
/// No-op when already read; `None` when the id is unknown or the message
/// belongs to someone else.
pub fn mark_community_message_read<S: BlobStore>(
    store: &S,
    message_id: &str,
) -> Result<Option<UserCommunityMessage>, BackendError> {
    let session = require_session(store)?;
    let mut db = require_db(store)?;
    let Some(message) = db
        .community_messages
        .iter_mut()
        .find(|m| m.id == message_id && m.user_id == session.user_id)
    else {
        return Ok(None);
    };
    if message.read_at.is_some() {
        return Ok(Some(message.clone()));
    }
    message.read_at = Some(Utc::now());
    let updated = message.clone();
    write_db(store, &db)?;
    Ok(Some(updated))
}

/// The current user's subscriptions, newest first
pub fn my_subscriptions<S: BlobStore>(store: &S) -> Result<Vec<BrandSubscription>, BackendError> {
    let session = require_session(store)?;
    let db = require_db(store)?;
    let mut rows: Vec<_> = db
        .subscriptions
        .into_iter()
        .filter(|s| s.user_id == session.user_id)
        .collect();
    rows.sort_by(|a, b| b.subscribed_at.cmp(&a.subscribed_at));
    Ok(rows)
}

/// The current user's memberships, newest first
pub fn my_memberships<S: BlobStore>(store: &S) -> Result<Vec<CommunityMembership>, BackendError> {
    let session = require_session(store)?;
    let db = require_db(store)?;
    let mut rows: Vec<_> = db
        .memberships
        .into_iter()
        .filter(|m| m.user_id == session.user_id)
        .collect();
    rows.sort_by(|a, b| b.joined_at.cmp(&a.joined_at));
    Ok(rows)
}

/// The current user's event registrations, newest first
pub fn my_registrations<S: BlobStore>(store: &S) -> Result<Vec<EventRegistration>, BackendError> {
    let session = require_session(store)?;
    let db = require_db(store)?;
    let mut rows: Vec<_> = db
        .registrations
        .into_iter()
        .filter(|r| r.user_id == session.user_id)
        .collect();
    rows.sort_by(|a, b| b.registered_at.cmp(&a.registered_at));
    Ok(rows)
}

/// The current user's brand notifications, newest first
pub fn my_notifications<S: BlobStore>(store: &S) -> Result<Vec<UserNotification>, BackendError> {
    let session = require_session(store)?;
    let db = require_db(store)?;
    let mut rows: Vec<_> = db
        .notifications
        .into_iter()
        .filter(|n| n.user_id == session.user_id)
        .collect();
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(rows)
}

/// The current user's community messages, newest first
pub fn my_community_messages<S: BlobStore>(
    store: &S,
) -> Result<Vec<UserCommunityMessage>, BackendError> {
    let session = require_session(store)?;
    let db = require_db(store)?;
    let mut rows: Vec<_> = db
        .community_messages
        .into_iter()
        .filter(|m| m.user_id == session.user_id)
        .collect();
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::require_db;
    use crate::store::InMemoryBlobStore;

    fn business_input(email: &str, display: &str, business: &str) -> SignUpInput {
        SignUpInput::Business {
            email: email.to_string(),
            display_name: display.to_string(),
            business_name: business.to_string(),
        }
    }

    #[test]
    fn test_business_sign_up_synthesizes_personal_and_business_roles() {
        let store = InMemoryBlobStore::new();
        let session = sign_up(&store, business_input("e@x.com", "D", "Acme")).unwrap();

        assert_eq!(session.roles.len(), 2);
        assert_eq!(session.roles[0].account_type, AccountType::Personal);
        assert_eq!(session.roles[0].label, "D");
        assert_eq!(session.roles[1].account_type, AccountType::Business);
        assert_eq!(session.roles[1].label, "Acme");
        assert_eq!(session.active_role_index, 1);
    }

    #[test]
    fn test_business_sign_up_inserts_brand_with_digital_id() {
        let store = InMemoryBlobStore::new();
        let session = sign_up(&store, business_input("e@x.com", "D", "Acme Coffee Co")).unwrap();

        let db = require_db(&store).unwrap();
        let brand = &db.brands[0];
        assert_eq!(brand.name, "Acme Coffee Co");
        assert_eq!(brand.digital_id, "WD-B-ACMECOFFEE");
        assert_eq!(session.active_role().unwrap().account_id, brand.id);
    }

    #[test]
    fn test_repeat_sign_up_same_email_extends_the_session() {
        let store = InMemoryBlobStore::new();
        let first = sign_up(&store, business_input("e@x.com", "D", "Acme")).unwrap();
        let second = sign_up(&store, business_input("e@x.com", "D", "Beta Books")).unwrap();

        assert_eq!(second.user_id, first.user_id);
        assert_eq!(second.roles.len(), 3);
        assert_eq!(second.active_role().unwrap().label, "Beta Books");

        let db = require_db(&store).unwrap();
        // Newest brand sits at the front
        assert_eq!(db.brands[0].name, "Beta Books");
    }

    #[test]
    fn test_sign_up_different_email_replaces_the_session() {
        let store = InMemoryBlobStore::new();
        let first = sign_up(&store, business_input("e@x.com", "D", "Acme")).unwrap();
        let second = sign_up(
            &store,
            SignUpInput::Personal {
                email: "other@x.com".to_string(),
                display_name: "O".to_string(),
            },
        )
        .unwrap();

        assert_ne!(second.user_id, first.user_id);
        assert_eq!(second.roles.len(), 1);
        assert_eq!(second.roles[0].account_type, AccountType::Personal);
    }

    #[test]
    fn test_community_sign_up_carries_approval_flag() {
        let store = InMemoryBlobStore::new();
        sign_up(
            &store,
            SignUpInput::Community {
                email: "e@x.com".to_string(),
                display_name: "D".to_string(),
                community_name: "Makers Guild".to_string(),
                approval_required: true,
            },
        )
        .unwrap();

        let db = require_db(&store).unwrap();
        assert_eq!(db.communities[0].digital_id, "WD-C-MAKERSGUIL");
        assert!(db.communities[0].approval_required);
    }

    #[test]
    fn test_sign_up_blank_org_name_rejected() {
        let store = InMemoryBlobStore::new();
        let err = sign_up(&store, business_input("e@x.com", "D", "   ")).unwrap_err();
        assert!(matches!(err, BackendError::Validation(_)));
    }

    #[test]
    fn test_sign_in_fabricates_personal_session() {
        let store = InMemoryBlobStore::new();
        let session = sign_in(&store, "  Dana@Example.COM ").unwrap();

        assert_eq!(session.email, "dana@example.com");
        assert_eq!(session.display_name, "dana");
        assert_eq!(session.roles.len(), 1);
        assert_eq!(session.roles[0].account_type, AccountType::Personal);
    }

    #[test]
    fn test_sign_in_same_email_reuses_session() {
        let store = InMemoryBlobStore::new();
        let first = sign_in(&store, "dana@example.com").unwrap();
        let again = sign_in(&store, "DANA@example.com").unwrap();
        assert_eq!(again.user_id, first.user_id);

        let other = sign_in(&store, "lee@example.com").unwrap();
        assert_ne!(other.user_id, first.user_id);
    }

    #[test]
    fn test_sign_out_removes_the_session() {
        let store = InMemoryBlobStore::new();
        sign_in(&store, "dana@example.com").unwrap();
        sign_out(&store).unwrap();
        assert!(current_session(&store).unwrap().is_none());
    }

    #[test]
    fn test_set_active_role_index_clamps() {
        let store = InMemoryBlobStore::new();
        sign_up(&store, business_input("e@x.com", "D", "Acme")).unwrap();
        let session = set_active_role_index(&store, 99).unwrap();
        assert_eq!(session.active_role_index, 1);
    }

    #[test]
    fn test_subscribe_is_idempotent() {
        let store = InMemoryBlobStore::new();
        sign_in(&store, "dana@example.com").unwrap();
        let brand_id = list_brands(&store).unwrap()[0].id.clone();

        let first = subscribe_to_brand(&store, &brand_id).unwrap();
        let second = subscribe_to_brand(&store, &brand_id).unwrap();
        assert_eq!(second.id, first.id);

        let db = require_db(&store).unwrap();
        assert_eq!(db.subscriptions.len(), 1);
    }

    #[test]
    fn test_subscribe_requires_session_and_brand() {
        let store = InMemoryBlobStore::new();
        assert!(matches!(
            subscribe_to_brand(&store, "brand_missing"),
            Err(BackendError::NotSignedIn)
        ));

        sign_in(&store, "dana@example.com").unwrap();
        assert!(matches!(
            subscribe_to_brand(&store, "brand_missing"),
            Err(BackendError::NotFound("Brand"))
        ));
    }

    #[test]
    fn test_join_status_tracks_approval_flag() {
        let store = InMemoryBlobStore::new();
        sign_in(&store, "dana@example.com").unwrap();
        let communities = list_communities(&store).unwrap();
        let open = communities.iter().find(|c| !c.approval_required).unwrap();
        let gated = communities.iter().find(|c| c.approval_required).unwrap();

        assert_eq!(
            join_community(&store, &open.id).unwrap().status,
            MembershipStatus::Active
        );
        assert_eq!(
            join_community(&store, &gated.id).unwrap().status,
            MembershipStatus::Pending
        );

        // Joining again changes nothing
        join_community(&store, &open.id).unwrap();
        assert_eq!(require_db(&store).unwrap().memberships.len(), 2);
    }

    #[test]
    fn test_approve_membership_flips_pending_only() {
        let store = InMemoryBlobStore::new();
        sign_in(&store, "dana@example.com").unwrap();
        let gated = list_communities(&store)
            .unwrap()
            .into_iter()
            .find(|c| c.approval_required)
            .unwrap();
        let membership = join_community(&store, &gated.id).unwrap();

        let approved = approve_membership(&store, &membership.id).unwrap().unwrap();
        assert_eq!(approved.status, MembershipStatus::Active);

        // Already active: unchanged; unknown id: None
        let again = approve_membership(&store, &membership.id).unwrap().unwrap();
        assert_eq!(again.status, MembershipStatus::Active);
        assert!(approve_membership(&store, "mem_missing").unwrap().is_none());
    }

    #[test]
    fn test_register_for_event_is_idempotent() {
        let store = InMemoryBlobStore::new();
        sign_in(&store, "dana@example.com").unwrap();
        let event_id = list_events(&store).unwrap()[0].id.clone();

        register_for_event(&store, &event_id).unwrap();
        register_for_event(&store, &event_id).unwrap();
        assert_eq!(require_db(&store).unwrap().registrations.len(), 1);
    }

    #[test]
    fn test_brand_notification_reaches_subscribers_only() {
        let store = InMemoryBlobStore::new();
        let brand_id = {
            sign_in(&store, "u1@x.com").unwrap();
            list_brands(&store).unwrap()[0].id.clone()
        };
        let u1 = subscribe_to_brand(&store, &brand_id).unwrap().user_id;
        sign_out(&store).unwrap();

        sign_in(&store, "u2@x.com").unwrap();
        let u2 = subscribe_to_brand(&store, &brand_id).unwrap().user_id;
        sign_out(&store).unwrap();

        // u3 never subscribes
        sign_in(&store, "u3@x.com").unwrap();

        let rows = create_brand_notification(&store, &brand_id, " Launch day ", "Doors at 9").unwrap();
        assert_eq!(rows.len(), 2);
        let recipients: Vec<&str> = rows.iter().map(|r| r.user_id.as_str()).collect();
        assert!(recipients.contains(&u1.as_str()));
        assert!(recipients.contains(&u2.as_str()));
        assert_eq!(rows[0].title, "Launch day");
        assert_eq!(rows[0].created_at, rows[1].created_at);

        // The signed-in non-subscriber sees nothing
        assert!(my_notifications(&store).unwrap().is_empty());
    }

    #[test]
    fn test_blank_broadcast_text_gets_defaults() {
        let store = InMemoryBlobStore::new();
        sign_in(&store, "u1@x.com").unwrap();
        let brand_id = list_brands(&store).unwrap()[0].id.clone();
        subscribe_to_brand(&store, &brand_id).unwrap();

        let rows = create_brand_notification(&store, &brand_id, "  ", "").unwrap();
        assert_eq!(rows[0].title, "Untitled");
        assert_eq!(rows[0].message, "(no message)");
    }

    #[test]
    fn test_announcement_skips_pending_members() {
        let store = InMemoryBlobStore::new();
        let gated = {
            sign_in(&store, "u1@x.com").unwrap();
            list_communities(&store)
                .unwrap()
                .into_iter()
                .find(|c| c.approval_required)
                .unwrap()
        };
        let pending = join_community(&store, &gated.id).unwrap();
        assert_eq!(pending.status, MembershipStatus::Pending);

        let rows = create_community_announcement(&store, &gated.id, "Hello", "First!").unwrap();
        assert!(rows.is_empty());

        approve_membership(&store, &pending.id).unwrap();
        let rows = create_community_announcement(&store, &gated.id, "Hello", "Again").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_id, pending.user_id);
    }

    #[test]
    fn test_mark_message_read_is_owner_scoped() {
        let store = InMemoryBlobStore::new();
        let community_id = {
            sign_in(&store, "u1@x.com").unwrap();
            list_communities(&store)
                .unwrap()
                .into_iter()
                .find(|c| !c.approval_required)
                .unwrap()
                .id
        };
        join_community(&store, &community_id).unwrap();
        let rows = create_community_announcement(&store, &community_id, "Hi", "There").unwrap();
        let message_id = rows[0].id.clone();

        let read = mark_community_message_read(&store, &message_id).unwrap().unwrap();
        assert!(read.read_at.is_some());

        // Second call keeps the original timestamp
        let again = mark_community_message_read(&store, &message_id).unwrap().unwrap();
        assert_eq!(again.read_at, read.read_at);

        // Another user cannot touch it
        sign_out(&store).unwrap();
        sign_in(&store, "u2@x.com").unwrap();
        assert!(mark_community_message_read(&store, &message_id).unwrap().is_none());
    }

    #[test]
    fn test_my_queries_filter_by_user_and_sort_newest_first() {
        let store = InMemoryBlobStore::new();
        sign_in(&store, "u1@x.com").unwrap();
        let brands = list_brands(&store).unwrap();
        subscribe_to_brand(&store, &brands[2].id).unwrap();
        subscribe_to_brand(&store, &brands[0].id).unwrap();

        let mine = my_subscriptions(&store).unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine[0].subscribed_at >= mine[1].subscribed_at);

        sign_out(&store).unwrap();
        sign_in(&store, "u2@x.com").unwrap();
        assert!(my_subscriptions(&store).unwrap().is_empty());
    }
}
