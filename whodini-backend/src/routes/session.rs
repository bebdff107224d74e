//! Session endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{self, SignUpInput};
use crate::credentials::CredentialStore;
use crate::error::BackendError;
use crate::state::AppState;
use crate::store::{BlobStore, Session};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
    pub server_time: i64,
}

/// GET /api/session
pub async fn session_context<B, C>(
    State(state): State<Arc<AppState<B, C>>>,
) -> Result<Json<SessionContext>, BackendError>
where
    B: BlobStore,
    C: CredentialStore,
{
    let session = api::current_session(&state.blob_store)?;
    Ok(Json(SessionContext {
        authenticated: session.is_some(),
        session,
        server_time: chrono::Utc::now().timestamp(),
    }))
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub session: Session,
}

/// POST /api/session/sign_up
pub async fn sign_up<B, C>(
    State(state): State<Arc<AppState<B, C>>>,
    Json(req): Json<SignUpInput>,
) -> Result<Json<SessionResponse>, BackendError>
where
    B: BlobStore,
    C: CredentialStore,
{
    let session = api::sign_up(&state.blob_store, req)?;
    Ok(Json(SessionResponse {
        success: true,
        session,
    }))
}

#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: String,
}

/// POST /api/session/sign_in
pub async fn sign_in<B, C>(
    State(state): State<Arc<AppState<B, C>>>,
    Json(req): Json<SignInRequest>,
) -> Result<Json<SessionResponse>, BackendError>
where
    B: BlobStore,
    C: CredentialStore,
{
    let session = api::sign_in(&state.blob_store, &req.email)?;
    Ok(Json(SessionResponse {
        success: true,
        session,
    }))
}

#[derive(Serialize)]
pub struct SignOutResponse {
    pub success: bool,
}

/// POST /api/session/sign_out
pub async fn sign_out<B, C>(
    State(state): State<Arc<AppState<B, C>>>,
) -> Result<Json<SignOutResponse>, BackendError>
where
    B: BlobStore,
    C: CredentialStore,
{
    api::sign_out(&state.blob_store)?;
    Ok(Json(SignOutResponse { success: true }))
}

#[derive(Deserialize)]
pub struct ActiveRoleRequest {
    pub index: usize,
}

/// POST /api/session/active_role
pub async fn set_active_role<B, C>(
    State(state): State<Arc<AppState<B, C>>>,
    Json(req): Json<ActiveRoleRequest>,
) -> Result<Json<SessionResponse>, BackendError>
where
    B: BlobStore,
    C: CredentialStore,
{
    let session = api::set_active_role_index(&state.blob_store, req.index)?;
    Ok(Json(SessionResponse {
        success: true,
        session,
    }))
}
