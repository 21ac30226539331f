//! Menu item repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::{MenuItem, OrderUpdate};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuItemRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<MenuItem>, DomainError>;
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<MenuItem>, DomainError>;
    /// All items of a location ordered by `sort_order`, then `created_at`
    async fn find_by_location(&self, location_id: &Uuid) -> Result<Vec<MenuItem>, DomainError>;
    async fn create(&self, item: &MenuItem) -> Result<MenuItem, DomainError>;
    async fn update(&self, item: &MenuItem) -> Result<MenuItem, DomainError>;
    /// Returns false when nothing was deleted. Children are promoted to roots.
    async fn delete(&self, id: &Uuid) -> Result<bool, DomainError>;
    /// Applies every update or none of them
    async fn bulk_update_order(&self, updates: &[OrderUpdate]) -> Result<u64, DomainError>;
}
