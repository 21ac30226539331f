//! Application-wide constants

/// Deepest level a menu item may occupy (root = 1).
pub const MAX_MENU_DEPTH: u32 = 3;
pub const DEFAULT_MENU_URL: &str = "#";
pub const MAX_BULK_ORDER_ITEMS: usize = 500;
pub const AUTH_COOKIE_NAME: &str = "token";
