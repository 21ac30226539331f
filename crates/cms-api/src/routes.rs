// ============================================================================
// CMS API - Router
// File: crates/cms-api/src/routes.rs
// ============================================================================

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::handlers::{health, menu_items, menu_locations, menus};
use crate::middleware::require_auth;
use crate::state::AppState;

/// Public and admin routes. Cross-cutting layers (CORS, tracing) are added by the binary.
pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/api/menus/{slug}", get(menus::get_public_menu));

    let admin = Router::new()
        .route(
            "/api/menu-locations",
            get(menu_locations::list_menu_locations).post(menu_locations::create_menu_location),
        )
        .route(
            "/api/menu-locations/{id}",
            get(menu_locations::get_menu_location)
                .put(menu_locations::update_menu_location)
                .delete(menu_locations::delete_menu_location),
        )
        .route(
            "/api/menu-items",
            get(menu_items::list_menu_items).post(menu_items::create_menu_item),
        )
        .route(
            "/api/menu-items/bulk/update-order",
            post(menu_items::bulk_update_order),
        )
        .route(
            "/api/menu-items/{id}",
            get(menu_items::get_menu_item)
                .put(menu_items::update_menu_item)
                .delete(menu_items::delete_menu_item),
        )
        .route(
            "/api/menu-items/{id}/can-move",
            get(menu_items::can_move_menu_item),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public.merge(admin).with_state(state)
}
