//! Repository traits (ports)

pub mod menu_item_repository;
pub mod menu_location_repository;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;

pub use menu_item_repository::MenuItemRepository;
pub use menu_location_repository::MenuLocationRepository;
#[cfg(test)]
pub use menu_item_repository::MockMenuItemRepository;
#[cfg(test)]
pub use menu_location_repository::MockMenuLocationRepository;
