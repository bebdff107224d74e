//! Community endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api;
use crate::credentials::CredentialStore;
use crate::error::BackendError;
use crate::state::AppState;
use crate::store::{BlobStore, Community, CommunityMembership, UserCommunityMessage};

#[derive(Serialize)]
pub struct CommunitiesResponse {
    pub success: bool,
    pub communities: Vec<Community>,
}

/// GET /api/communities
pub async fn list_communities<B, C>(
    State(state): State<Arc<AppState<B, C>>>,
) -> Result<Json<CommunitiesResponse>, BackendError>
where
    B: BlobStore,
    C: CredentialStore,
{
    let communities = api::list_communities(&state.blob_store)?;
    Ok(Json(CommunitiesResponse {
        success: true,
        communities,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub community_id: String,
}

#[derive(Serialize)]
pub struct JoinResponse {
    pub success: bool,
    /// The membership's status tells the caller whether approval is pending
    pub membership: CommunityMembership,
}

/// POST /api/join
pub async fn join<B, C>(
    State(state): State<Arc<AppState<B, C>>>,
    Json(req): Json<JoinRequest>,
) -> Result<Json<JoinResponse>, BackendError>
where
    B: BlobStore,
    C: CredentialStore,
{
    let membership = api::join_community(&state.blob_store, &req.community_id)?;
    Ok(Json(JoinResponse {
        success: true,
        membership,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveMembershipRequest {
    pub membership_id: String,
}

#[derive(Serialize)]
pub struct ApproveMembershipResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub membership: Option<CommunityMembership>,
}

/// POST /api/approve_membership
pub async fn approve_membership<B, C>(
    State(state): State<Arc<AppState<B, C>>>,
    Json(req): Json<ApproveMembershipRequest>,
) -> Result<Json<ApproveMembershipResponse>, BackendError>
where
    B: BlobStore,
    C: CredentialStore,
{
    let membership = api::approve_membership(&state.blob_store, &req.membership_id)?;
    Ok(Json(ApproveMembershipResponse {
        success: true,
        membership,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnounceRequest {
    pub community_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize)]
pub struct AnnounceResponse {
    pub success: bool,
    pub recipients: usize,
}

/// POST /api/announce
pub async fn announce<B, C>(
    State(state): State<Arc<AppState<B, C>>>,
    Json(req): Json<AnnounceRequest>,
) -> Result<Json<AnnounceResponse>, BackendError>
where
    B: BlobStore,
    C: CredentialStore,
{
    let rows = api::create_community_announcement(
        &state.blob_store,
        &req.community_id,
        &req.title,
        &req.message,
    )?;
    Ok(Json(AnnounceResponse {
        success: true,
        recipients: rows.len(),
    }))
}

#[derive(Serialize)]
pub struct MyMembershipsResponse {
    pub success: bool,
    pub memberships: Vec<CommunityMembership>,
}

/// GET /api/my/memberships
pub async fn my_memberships<B, C>(
    State(state): State<Arc<AppState<B, C>>>,
) -> Result<Json<MyMembershipsResponse>, BackendError>
where
    B: BlobStore,
    C: CredentialStore,
{
    let memberships = api::my_memberships(&state.blob_store)?;
    Ok(Json(MyMembershipsResponse {
        success: true,
        memberships,
    }))
}

#[derive(Serialize)]
pub struct MyMessagesResponse {
    pub success: bool,
    pub messages: Vec<UserCommunityMessage>,
}

/// GET /api/my/messages
pub async fn my_messages<B, C>(
    State(state): State<Arc<AppState<B, C>>>,
) -> Result<Json<MyMessagesResponse>, BackendError>
where
    B: BlobStore,
    C: CredentialStore,
{
    let messages = api::my_community_messages(&state.blob_store)?;
    Ok(Json(MyMessagesResponse {
        success: true,
        messages,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadRequest {
    pub message_id: String,
}

#[derive(Serialize)]
pub struct MarkReadResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<UserCommunityMessage>,
}

/// POST /api/mark_message_read
pub async fn mark_message_read<B, C>(
    State(state): State<Arc<AppState<B, C>>>,
    Json(req): Json<MarkReadRequest>,
) -> Result<Json<MarkReadResponse>, BackendError>
where
    B: BlobStore,
    C: CredentialStore,
{
    let message = api::mark_community_message_read(&state.blob_store, &req.message_id)?;
    Ok(Json(MarkReadResponse {
        success: true,
        message,
    }))
}
