//! Brand endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api;
use crate::credentials::CredentialStore;
use crate::error::BackendError;
use crate::state::AppState;
use crate::store::{BlobStore, Brand, BrandSubscription, UserNotification};

#[derive(Serialize)]
pub struct BrandsResponse {
    pub success: bool,
    pub brands: Vec<Brand>,
}

/// GET /api/brands
pub async fn list_brands<B, C>(
    State(state): State<Arc<AppState<B, C>>>,
) -> Result<Json<BrandsResponse>, BackendError>
where
    B: BlobStore,
    C: CredentialStore,
{
    let brands = api::list_brands(&state.blob_store)?;
    Ok(Json(BrandsResponse {
        success: true,
        brands,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub brand_id: String,
}

#[derive(Serialize)]
pub struct SubscribeResponse {
    pub success: bool,
    pub subscription: BrandSubscription,
}

/// POST /api/subscribe
pub async fn subscribe<B, C>(
    State(state): State<Arc<AppState<B, C>>>,
    Json(req): Json<SubscribeRequest>,
) -> Result<Json<SubscribeResponse>, BackendError>
where
    B: BlobStore,
    C: CredentialStore,
{
    let subscription = api::subscribe_to_brand(&state.blob_store, &req.brand_id)?;
    Ok(Json(SubscribeResponse {
        success: true,
        subscription,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyRequest {
    pub brand_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize)]
pub struct NotifyResponse {
    pub success: bool,
    pub recipients: usize,
}

/// POST /api/notify
pub async fn notify_subscribers<B, C>(
    State(state): State<Arc<AppState<B, C>>>,
    Json(req): Json<NotifyRequest>,
) -> Result<Json<NotifyResponse>, BackendError>
where
    B: BlobStore,
    C: CredentialStore,
{
    let rows =
        api::create_brand_notification(&state.blob_store, &req.brand_id, &req.title, &req.message)?;
    Ok(Json(NotifyResponse {
        success: true,
        recipients: rows.len(),
    }))
}

#[derive(Serialize)]
pub struct MySubscriptionsResponse {
    pub success: bool,
    pub subscriptions: Vec<BrandSubscription>,
}

/// GET /api/my/subscriptions
pub async fn my_subscriptions<B, C>(
    State(state): State<Arc<AppState<B, C>>>,
) -> Result<Json<MySubscriptionsResponse>, BackendError>
where
    B: BlobStore,
    C: CredentialStore,
{
    let subscriptions = api::my_subscriptions(&state.blob_store)?;
    Ok(Json(MySubscriptionsResponse {
        success: true,
        subscriptions,
    }))
}

#[derive(Serialize)]
pub struct MyNotificationsResponse {
    pub success: bool,
    pub notifications: Vec<UserNotification>,
}

/// GET /api/my/notifications
pub async fn my_notifications<B, C>(
    State(state): State<Arc<AppState<B, C>>>,
) -> Result<Json<MyNotificationsResponse>, BackendError>
where
    B: BlobStore,
    C: CredentialStore,
{
    let notifications = api::my_notifications(&state.blob_store)?;
    Ok(Json(MyNotificationsResponse {
        success: true,
        notifications,
    }))
}
