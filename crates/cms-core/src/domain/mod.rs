//! # CMS Core - Domain Module
//! 
//! Domain entities for the menu subsystem.

pub mod menu_item;
pub mod menu_location;

// Re-export all entities and enums
pub use menu_item::{LinkTarget, MenuItem, MenuItemChanges, MenuItemType, NewMenuItem, OrderUpdate};
pub use menu_location::{MenuLocation, MenuLocationChanges, NewMenuLocation};
