//! HTTP routes for the simulated backend
//!
//! Handlers stay thin: extract JSON, call the API or credential layer, wrap
//! the result. Errors render as `{ "success": false, "reason": ... }` and
//! the front end shows `reason` verbatim.

mod brands;
mod communities;
mod events;
mod local;
mod session;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::credentials::CredentialStore;
use crate::state::AppState;
use crate::store::BlobStore;

/// Create the router with all routes
pub fn create_router<B, C>(state: Arc<AppState<B, C>>) -> Router
where
    B: BlobStore + 'static,
    C: CredentialStore + 'static,
{
    Router::new()
        .route("/api/session", get(session::session_context))
        .route("/api/session/sign_up", post(session::sign_up))
        .route("/api/session/sign_in", post(session::sign_in))
        .route("/api/session/sign_out", post(session::sign_out))
        .route("/api/session/active_role", post(session::set_active_role))
        .route("/api/brands", get(brands::list_brands))
        .route("/api/subscribe", post(brands::subscribe))
        .route("/api/notify", post(brands::notify_subscribers))
        .route("/api/my/subscriptions", get(brands::my_subscriptions))
        .route("/api/my/notifications", get(brands::my_notifications))
        .route("/api/communities", get(communities::list_communities))
        .route("/api/join", post(communities::join))
        .route("/api/approve_membership", post(communities::approve_membership))
        .route("/api/announce", post(communities::announce))
        .route("/api/my/memberships", get(communities::my_memberships))
        .route("/api/my/messages", get(communities::my_messages))
        .route("/api/mark_message_read", post(communities::mark_message_read))
        .route("/api/events", get(events::list_events))
        .route("/api/register_event", post(events::register))
        .route("/api/my/registrations", get(events::my_registrations))
        .route("/api/local/register", post(local::register))
        .route("/api/local/authenticate", post(local::authenticate))
        .route("/api/local/user", get(local::get_user))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
