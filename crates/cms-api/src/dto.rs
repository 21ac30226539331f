//! Request and response bodies that are not domain entities

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use cms_core::domain::{MenuItem, OrderUpdate};
use cms_core::tree::MenuTreeNode;
use cms_shared::constants::MAX_BULK_ORDER_ITEMS;

#[derive(Debug, Deserialize)]
pub struct MenuItemListQuery {
    pub location_id: Uuid,
}

/// Missing `parent_id` asks about moving to the root level
#[derive(Debug, Deserialize)]
pub struct CanMoveQuery {
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct MenuItemListResponse {
    pub data: Vec<MenuTreeNode>,
    pub flat: Vec<MenuItem>,
}

fn validate_batch_size(items: &[OrderUpdate]) -> Result<(), ValidationError> {
    if items.is_empty() || items.len() > MAX_BULK_ORDER_ITEMS {
        let mut error = ValidationError::new("batch_size");
        error.message = Some(
            format!("items must contain between 1 and {} entries", MAX_BULK_ORDER_ITEMS).into(),
        );
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
pub struct BulkOrderRequest {
    #[validate(custom(function = "validate_batch_size"))]
    pub items: Vec<OrderUpdate>,
}

#[derive(Debug, Serialize)]
pub struct BulkOrderResponse {
    pub message: String,
    pub updated: u64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(len: usize) -> BulkOrderRequest {
        BulkOrderRequest {
            items: (0..len)
                .map(|n| OrderUpdate {
                    id: Uuid::new_v4(),
                    sort_order: n as i32,
                    parent_id: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_batch_size_follows_shared_limit() {
        assert!(batch(0).validate().is_err());
        assert!(batch(1).validate().is_ok());
        assert!(batch(MAX_BULK_ORDER_ITEMS).validate().is_ok());
        assert!(batch(MAX_BULK_ORDER_ITEMS + 1).validate().is_err());
    }
}
