//! Domain services (business logic)

pub mod menu_item_service;
pub mod menu_location_service;

pub use menu_item_service::{MenuItemService, MenuListing};
pub use menu_location_service::{MenuLocationService, PublicMenu};
