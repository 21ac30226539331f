//! # CMS Infrastructure
//! 
//! PostgreSQL implementations (adapters) of the menu repositories.

pub mod database;

pub use database::{check_connection, create_pool, run_migrations, PgMenuItemRepository, PgMenuLocationRepository};
