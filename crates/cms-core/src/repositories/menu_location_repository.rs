//! Menu location repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::MenuLocation;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuLocationRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<MenuLocation>, DomainError>;
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<MenuLocation>, DomainError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<MenuLocation>, DomainError>;
    async fn create(&self, location: &MenuLocation) -> Result<MenuLocation, DomainError>;
    async fn update(&self, location: &MenuLocation) -> Result<MenuLocation, DomainError>;
    /// Deletes the location and all of its items
    async fn delete(&self, id: &Uuid) -> Result<bool, DomainError>;
}
