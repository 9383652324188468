//! # Guest Routes
//!
//! Thin translation from HTTP verbs and paths to [`GuestStore`] operations.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};

use crate::store::{GuestPatch, GuestStore, NewGuest};

use super::errors::ApiResult;
use super::request::{AccompanistCreate, AppJson, AppPath, GuestCreate, GuestUpdate};
use super::response::{AccompanistResponse, GuestResponse, HealthResponse, MessageResponse};

/// State shared across handlers
pub struct AppState {
    pub store: GuestStore,
}

impl AppState {
    pub fn new(store: GuestStore) -> Self {
        Self { store }
    }
}

type SharedState = Arc<AppState>;

/// Guest and accompanist endpoints. Collection paths answer with and
/// without the trailing slash.
pub fn guest_routes(state: SharedState) -> Router {
    Router::new()
        .route("/guests", get(list_guests_handler).post(create_guest_handler))
        .route("/guests/", get(list_guests_handler).post(create_guest_handler))
        .route(
            "/guests/:guest_id",
            get(get_guest_handler)
                .patch(update_guest_handler)
                .delete(delete_guest_handler),
        )
        .route("/guests/:guest_id/accompanists", post(add_accompanist_handler))
        .route("/guests/:guest_id/accompanists/", post(add_accompanist_handler))
        .route(
            "/guests/:guest_id/accompanists/:accompanist_id",
            put(rename_accompanist_handler).delete(delete_accompanist_handler),
        )
        .with_state(state)
}

/// Health check route, reachable at the root
pub fn health_routes(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(state)
}

async fn create_guest_handler(
    State(state): State<SharedState>,
    AppJson(body): AppJson<GuestCreate>,
) -> ApiResult<Json<GuestResponse>> {
    let guest = state.store.create_guest(NewGuest::from(body)).await?;
    Ok(Json(guest.into()))
}

async fn get_guest_handler(
    State(state): State<SharedState>,
    AppPath(guest_id): AppPath<i64>,
) -> ApiResult<Json<GuestResponse>> {
    let guest = state.store.get_guest(guest_id).await?;
    Ok(Json(guest.into()))
}

async fn list_guests_handler(
    State(state): State<SharedState>,
) -> ApiResult<Json<Vec<GuestResponse>>> {
    let guests = state.store.list_guests().await?;
    Ok(Json(guests.into_iter().map(Into::into).collect()))
}

async fn add_accompanist_handler(
    State(state): State<SharedState>,
    AppPath(guest_id): AppPath<i64>,
    AppJson(body): AppJson<AccompanistCreate>,
) -> ApiResult<Json<GuestResponse>> {
    let guest = state.store.add_accompanist(guest_id, &body.name).await?;
    Ok(Json(guest.into()))
}

async fn delete_guest_handler(
    State(state): State<SharedState>,
    AppPath(guest_id): AppPath<i64>,
) -> ApiResult<Json<MessageResponse>> {
    state.store.delete_guest(guest_id).await?;
    Ok(Json(MessageResponse::new("Guest deleted successfully")))
}

async fn delete_accompanist_handler(
    State(state): State<SharedState>,
    AppPath((guest_id, accompanist_id)): AppPath<(i64, i64)>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .store
        .delete_accompanist(guest_id, accompanist_id)
        .await?;
    Ok(Json(MessageResponse::new("Accompanist deleted successfully")))
}

async fn rename_accompanist_handler(
    State(state): State<SharedState>,
    AppPath((guest_id, accompanist_id)): AppPath<(i64, i64)>,
    AppJson(body): AppJson<AccompanistCreate>,
) -> ApiResult<Json<AccompanistResponse>> {
    let accompanist = state
        .store
        .rename_accompanist(guest_id, accompanist_id, &body.name)
        .await?;
    Ok(Json(accompanist.into()))
}

async fn update_guest_handler(
    State(state): State<SharedState>,
    AppPath(guest_id): AppPath<i64>,
    AppJson(body): AppJson<GuestUpdate>,
) -> ApiResult<Json<GuestResponse>> {
    let guest = state
        .store
        .update_guest(guest_id, GuestPatch::from(body))
        .await?;
    Ok(Json(guest.into()))
}

async fn health_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let (code, status, database) = match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "ok", "ok"),
        Err(err) => {
            tracing::warn!(error = %err, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unreachable")
        }
    };

    let response = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    };
    (code, Json(response))
}
