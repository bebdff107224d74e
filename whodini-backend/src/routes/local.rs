//! Local credential endpoints
//!
//! These sit apart from the session endpoints on purpose: registering a
//! local user does not create a session, and session sign-in never checks
//! a password.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::credentials::{self, LocalUser, NewUser};
use crate::credentials::CredentialStore;
use crate::error::BackendError;
use crate::state::AppState;
use crate::store::BlobStore;

#[derive(Serialize)]
pub struct LocalUserResponse {
    pub success: bool,
    pub user: LocalUser,
}

/// POST /api/local/register
pub async fn register<B, C>(
    State(state): State<Arc<AppState<B, C>>>,
    Json(req): Json<NewUser>,
) -> Result<Json<LocalUserResponse>, BackendError>
where
    B: BlobStore,
    C: CredentialStore,
{
    let user = credentials::create_user(&state.credential_store, req)?;
    Ok(Json(LocalUserResponse {
        success: true,
        user,
    }))
}

#[derive(Deserialize)]
pub struct AuthenticateRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/local/authenticate
pub async fn authenticate<B, C>(
    State(state): State<Arc<AppState<B, C>>>,
    Json(req): Json<AuthenticateRequest>,
) -> Result<Json<LocalUserResponse>, BackendError>
where
    B: BlobStore,
    C: CredentialStore,
{
    let user = credentials::sign_in_with_email_password(
        &state.credential_store,
        &req.email,
        &req.password,
    )?;
    Ok(Json(LocalUserResponse {
        success: true,
        user,
    }))
}

#[derive(Deserialize)]
pub struct UserQuery {
    pub email: String,
}

#[derive(Serialize)]
pub struct GetUserResponse {
    pub success: bool,
    pub user: Option<LocalUser>,
}

/// GET /api/local/user?email=
pub async fn get_user<B, C>(
    State(state): State<Arc<AppState<B, C>>>,
    Query(query): Query<UserQuery>,
) -> Result<Json<GetUserResponse>, BackendError>
where
    B: BlobStore,
    C: CredentialStore,
{
    let user = credentials::get_user_by_email(&state.credential_store, &query.email)?;
    Ok(Json(GetUserResponse {
        success: true,
        user,
    }))
}
