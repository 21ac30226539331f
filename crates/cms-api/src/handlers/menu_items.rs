// ============================================================================
// CMS API - Menu Item Handlers
// File: crates/cms-api/src/handlers/menu_items.rs
// ============================================================================
//! Admin endpoints for menu items

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use cms_core::domain::{MenuItem, MenuItemChanges, NewMenuItem};
use cms_core::tree::MoveCheck;

use crate::dto::{
    BulkOrderRequest, BulkOrderResponse, CanMoveQuery, MenuItemListQuery, MenuItemListResponse,
    MessageResponse,
};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// GET /api/menu-items?location_id=
pub async fn list_menu_items(
    State(state): State<AppState>,
    query: Result<Query<MenuItemListQuery>, QueryRejection>,
) -> Result<Json<MenuItemListResponse>, ApiError> {
    let Query(query) = query?;
    let listing = state.menu_items.list_by_location(&query.location_id).await?;

    Ok(Json(MenuItemListResponse {
        data: listing.tree,
        flat: listing.flat,
    }))
}

/// GET /api/menu-items/{id}
pub async fn get_menu_item(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<MenuItem>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.menu_items.get(&id).await?))
}

/// POST /api/menu-items
pub async fn create_menu_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<NewMenuItem>, JsonRejection>,
) -> Result<(StatusCode, Json<MenuItem>), ApiError> {
    let Json(draft) = payload?;
    tracing::info!("User {} creates menu item '{}'", user.subject, draft.title);

    let item = state.menu_items.create(draft).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/menu-items/{id}
pub async fn update_menu_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<MenuItemChanges>, JsonRejection>,
) -> Result<Json<MenuItem>, ApiError> {
    let Path(id) = id?;
    let Json(changes) = payload?;
    tracing::info!("User {} updates menu item {}", user.subject, id);

    Ok(Json(state.menu_items.update(&id, changes).await?))
}

/// DELETE /api/menu-items/{id}
pub async fn delete_menu_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = id?;
    tracing::info!("User {} deletes menu item {}", user.subject, id);

    state.menu_items.delete(&id).await?;
    Ok(Json(MessageResponse::new("Menu item deleted")))
}

/// GET /api/menu-items/{id}/can-move?parent_id=
pub async fn can_move_menu_item(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<CanMoveQuery>, QueryRejection>,
) -> Result<Json<MoveCheck>, ApiError> {
    let Path(id) = id?;
    let Query(query) = query?;

    Ok(Json(state.menu_items.check_move(&id, query.parent_id).await?))
}

/// POST /api/menu-items/bulk/update-order
pub async fn bulk_update_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<BulkOrderRequest>, JsonRejection>,
) -> Result<Json<BulkOrderResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;
    tracing::info!("User {} reorders {} menu items", user.subject, request.items.len());

    let updated = state.menu_items.bulk_update_order(request.items).await?;
    Ok(Json(BulkOrderResponse {
        message: "Menu order updated".to_string(),
        updated,
    }))
}
