use std::sync::Arc;

use sqlx::PgPool;

use cms_core::services::{MenuItemService, MenuLocationService};
use cms_security::JwtService;

#[derive(Clone)]
pub struct AppState {
    pub menu_items: Arc<MenuItemService>,
    pub menu_locations: Arc<MenuLocationService>,
    pub jwt: Arc<JwtService>,
    /// Probed by the readiness check. `None` reports not ready.
    pub db: Option<PgPool>,
}
