//! Data models for the Whodini document store
//!
//! Everything serializes with camelCase field names; the JSON shape is the
//! stored format. Entities are flat records with string ids; relationship
//! rows carry foreign keys by id with no referential integrity beyond the
//! call-site existence checks in the API layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use whodini_core::AccountType;

/// A role attached to a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub account_type: AccountType,
    /// The entity this role acts as: the user id for personal, organizer,
    /// and agency roles; the brand or community id for org roles
    pub account_id: String,
    pub label: String,
}

/// The current signed-in identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    pub roles: Vec<Role>,
    pub active_role_index: usize,
}

impl Session {
    /// Clamp the active role index into `[0, roles.len() - 1]`
    pub fn clamp_active_role(&mut self) {
        if self.roles.is_empty() {
            self.active_role_index = 0;
        } else if self.active_role_index >= self.roles.len() {
            self.active_role_index = self.roles.len() - 1;
        }
    }

    pub fn active_role(&self) -> Option<&Role> {
        self.roles.get(self.active_role_index)
    }
}

/// A business brand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: String,
    pub digital_id: String,
    pub name: String,
    pub tagline: String,
    pub created_at: DateTime<Utc>,
}

/// A community organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    pub id: String,
    pub digital_id: String,
    pub name: String,
    pub description: String,
    /// New memberships start `pending` when set
    pub approval_required: bool,
    pub created_at: DateTime<Utc>,
}

/// An organized event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub venue: String,
    pub starts_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Membership approval state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Active,
    Pending,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Active => "active",
            MembershipStatus::Pending => "pending",
        }
    }
}

/// A user's subscription to a brand; at most one per (user, brand)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandSubscription {
    pub id: String,
    pub user_id: String,
    pub brand_id: String,
    pub subscribed_at: DateTime<Utc>,
}

/// A user's membership in a community; at most one per (user, community)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityMembership {
    pub id: String,
    pub user_id: String,
    pub community_id: String,
    pub status: MembershipStatus,
    pub joined_at: DateTime<Utc>,
}

/// A user's registration for an event; at most one per (user, event)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRegistration {
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    pub registered_at: DateTime<Utc>,
}

/// A per-user copy of a brand broadcast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNotification {
    pub id: String,
    pub user_id: String,
    pub from_brand_id: String,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// A per-user copy of a community announcement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCommunityMessage {
    pub id: String,
    pub user_id: String,
    pub from_community_id: String,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// The whole entity document, stored as one JSON blob
///
/// Named after the product prototype's "dummy database": independent lists,
/// mutated by push-to-front inserts, never deleted from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DummyDb {
    pub brands: Vec<Brand>,
    pub communities: Vec<Community>,
    pub events: Vec<Event>,
    pub subscriptions: Vec<BrandSubscription>,
    pub memberships: Vec<CommunityMembership>,
    pub registrations: Vec<EventRegistration>,
    pub notifications: Vec<UserNotification>,
    pub community_messages: Vec<UserCommunityMessage>,
}
