//! HTTP handlers

pub mod health;
pub mod menu_items;
pub mod menu_locations;
pub mod menus;
