//! Public, unauthenticated menu rendering

use axum::extract::{Path, State};
use axum::Json;

use cms_core::services::PublicMenu;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/menus/{slug}
pub async fn get_public_menu(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PublicMenu>, ApiError> {
    Ok(Json(state.menu_locations.public_menu(&slug).await?))
}
