//! Admin endpoints for menu locations

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use cms_core::domain::{MenuLocation, MenuLocationChanges, NewMenuLocation};

use crate::dto::MessageResponse;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

pub async fn list_menu_locations(
    State(state): State<AppState>,
) -> Result<Json<Vec<MenuLocation>>, ApiError> {
    Ok(Json(state.menu_locations.list().await?))
}

pub async fn get_menu_location(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<MenuLocation>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.menu_locations.get(&id).await?))
}

pub async fn create_menu_location(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<NewMenuLocation>, JsonRejection>,
) -> Result<(StatusCode, Json<MenuLocation>), ApiError> {
    let Json(draft) = payload?;
    tracing::info!("User {} creates menu location '{}'", user.subject, draft.name);

    let location = state.menu_locations.create(draft).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

pub async fn update_menu_location(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<MenuLocationChanges>, JsonRejection>,
) -> Result<Json<MenuLocation>, ApiError> {
    let Path(id) = id?;
    let Json(changes) = payload?;
    tracing::info!("User {} updates menu location {}", user.subject, id);

    Ok(Json(state.menu_locations.update(&id, changes).await?))
}

/// Deleting a location also deletes every item in it
pub async fn delete_menu_location(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = id?;
    tracing::info!("User {} deletes menu location {}", user.subject, id);

    state.menu_locations.delete(&id).await?;
    Ok(Json(MessageResponse::new("Menu location deleted")))
}
