//! Event endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api;
use crate::credentials::CredentialStore;
use crate::error::BackendError;
use crate::state::AppState;
use crate::store::{BlobStore, Event, EventRegistration};

#[derive(Serialize)]
pub struct EventsResponse {
    pub success: bool,
    pub events: Vec<Event>,
}

/// GET /api/events
pub async fn list_events<B, C>(
    State(state): State<Arc<AppState<B, C>>>,
) -> Result<Json<EventsResponse>, BackendError>
where
    B: BlobStore,
    C: CredentialStore,
{
    let events = api::list_events(&state.blob_store)?;
    Ok(Json(EventsResponse {
        success: true,
        events,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub event_id: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub registration: EventRegistration,
}

/// POST /api/register_event
pub async fn register<B, C>(
    State(state): State<Arc<AppState<B, C>>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, BackendError>
where
    B: BlobStore,
    C: CredentialStore,
{
    let registration = api::register_for_event(&state.blob_store, &req.event_id)?;
    Ok(Json(RegisterResponse {
        success: true,
        registration,
    }))
}

#[derive(Serialize)]
pub struct MyRegistrationsResponse {
    pub success: bool,
    pub registrations: Vec<EventRegistration>,
}

/// GET /api/my/registrations
pub async fn my_registrations<B, C>(
    State(state): State<Arc<AppState<B, C>>>,
) -> Result<Json<MyRegistrationsResponse>, BackendError>
where
    B: BlobStore,
    C: CredentialStore,
{
    let registrations = api::my_registrations(&state.blob_store)?;
    Ok(Json(MyRegistrationsResponse {
        success: true,
        registrations,
    }))
}
