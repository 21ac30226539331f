//! Domain errors

use thiserror::Error;
use uuid::Uuid;

use crate::tree::TreeError;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Menu item not found: {0}")]
    MenuItemNotFound(Uuid),

    #[error("Parent menu item not found: {0}")]
    ParentNotFound(Uuid),

    #[error("Menu location not found: {0}")]
    MenuLocationNotFound(String),

    #[error("Menu location slug already exists: {0}")]
    SlugAlreadyExists(String),

    #[error("Maximum menu depth exceeded: level {depth} is deeper than the allowed {max} levels")]
    MaxDepthExceeded { depth: u32, max: u32 },

    #[error("{0}")]
    InvalidMove(String),

    #[error("Menu tree is corrupted: cycle detected at menu item {0}")]
    CorruptedTree(Uuid),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Reference violation: {0}")]
    ReferenceViolation(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(errors.to_string())
    }
}

impl From<TreeError> for DomainError {
    fn from(error: TreeError) -> Self {
        match error {
            TreeError::NodeNotFound(id) => DomainError::MenuItemNotFound(id),
            TreeError::ParentNotFound(id) => DomainError::ParentNotFound(id),
            TreeError::Cycle(id) => DomainError::CorruptedTree(id),
            TreeError::DepthExceeded { depth, .. } => DomainError::MaxDepthExceeded {
                depth,
                max: cms_shared::constants::MAX_MENU_DEPTH,
            },
        }
    }
}
