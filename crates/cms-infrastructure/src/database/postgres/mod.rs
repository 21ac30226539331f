//! PostgreSQL repository implementations

pub mod menu_item_repo_impl;
pub mod menu_location_repo_impl;

pub use menu_item_repo_impl::PgMenuItemRepository;
pub use menu_location_repo_impl::PgMenuLocationRepository;

use cms_core::error::DomainError;
use tracing::error;

/// Logs the failure and maps constraint violations to domain errors.
pub(crate) fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    if let sqlx::Error::Database(db) = &e {
        if db.is_foreign_key_violation() || db.is_check_violation() {
            return DomainError::ReferenceViolation(db.message().to_string());
        }
    }
    DomainError::DatabaseError(e.to_string())
}
