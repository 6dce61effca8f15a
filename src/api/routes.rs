use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::api::error::ApiError;
use crate::core::dispatch::{
    CreateContainerRequest, DeleteContainerRequest, Dispatcher, UpdateStateRequest,
};
use crate::core::models::{ContainerListing, Operation};

/// Shared per-process state, assembled once in `main`.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/v1/container",
            post(create_container)
                .get(list_containers)
                .delete(delete_container),
        )
        .route("/api/v1/container/updatestate", post(update_container_state))
        .fallback(fallback_handler)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

#[axum::debug_handler]
async fn create_container(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateContainerRequest>,
) -> Result<Json<Operation>, ApiError> {
    let operation = state.dispatcher.create(request).await?;
    Ok(Json(operation))
}

#[axum::debug_handler]
async fn list_containers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ContainerListing>>, ApiError> {
    let listings = state.dispatcher.list().await?;
    Ok(Json(listings))
}

#[axum::debug_handler]
async fn update_container_state(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdateStateRequest>,
) -> Result<Json<Operation>, ApiError> {
    let operation = state.dispatcher.update_state(request).await?;
    Ok(Json(operation))
}

#[axum::debug_handler]
async fn delete_container(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DeleteContainerRequest>,
) -> Result<Json<Operation>, ApiError> {
    let operation = state.dispatcher.delete(request).await?;
    Ok(Json(operation))
}

async fn fallback_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}
