// ============================================================================
// CMS Core - Menu Location Service
// File: crates/cms-core/src/services/menu_location_service.rs
// ============================================================================
//! Menu location CRUD and the public, render-ready menu

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{MenuLocation, MenuLocationChanges, NewMenuLocation};
use crate::error::DomainError;
use crate::repositories::{MenuItemRepository, MenuLocationRepository};
use crate::tree::{assemble_tree, prune_inactive, MenuTreeNode};

/// Active items of an active location, nested for rendering
#[derive(Debug, Clone, Serialize)]
pub struct PublicMenu {
    pub location: MenuLocation,
    pub items: Vec<MenuTreeNode>,
}

pub struct MenuLocationService {
    locations: Arc<dyn MenuLocationRepository>,
    items: Arc<dyn MenuItemRepository>,
}

impl MenuLocationService {
    pub fn new(
        locations: Arc<dyn MenuLocationRepository>,
        items: Arc<dyn MenuItemRepository>,
    ) -> Self {
        Self { locations, items }
    }

    pub async fn list(&self) -> Result<Vec<MenuLocation>, DomainError> {
        self.locations.find_all().await
    }

    pub async fn get(&self, id: &Uuid) -> Result<MenuLocation, DomainError> {
        self.locations
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::MenuLocationNotFound(id.to_string()))
    }

    /// Inactive locations are reported as missing
    pub async fn public_menu(&self, slug: &str) -> Result<PublicMenu, DomainError> {
        let location = self
            .locations
            .find_by_slug(slug)
            .await?
            .filter(|l| l.is_active)
            .ok_or_else(|| DomainError::MenuLocationNotFound(slug.to_string()))?;

        let items = self.items.find_by_location(&location.id).await?;
        let items = prune_inactive(assemble_tree(items));

        Ok(PublicMenu { location, items })
    }

    pub async fn create(&self, draft: NewMenuLocation) -> Result<MenuLocation, DomainError> {
        let location = MenuLocation::new(draft)?;
        info!("Creating menu location: {}", location.slug);

        if self.locations.find_by_slug(&location.slug).await?.is_some() {
            warn!("Menu location slug already exists: {}", location.slug);
            return Err(DomainError::SlugAlreadyExists(location.slug));
        }

        let created = self.locations.create(&location).await?;
        info!("Menu location created: {}", created.id);
        Ok(created)
    }

    pub async fn update(&self, id: &Uuid, changes: MenuLocationChanges) -> Result<MenuLocation, DomainError> {
        let mut location = self.get(id).await?;
        let previous_slug = location.slug.clone();
        location.apply_changes(changes)?;

        if location.slug != previous_slug {
            if let Some(other) = self.locations.find_by_slug(&location.slug).await? {
                if other.id != location.id {
                    warn!("Menu location slug already exists: {}", location.slug);
                    return Err(DomainError::SlugAlreadyExists(location.slug));
                }
            }
        }

        let updated = self.locations.update(&location).await?;
        info!("Menu location updated: {}", updated.id);
        Ok(updated)
    }

    /// Removes the location together with its items
    pub async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        if !self.locations.delete(id).await? {
            return Err(DomainError::MenuLocationNotFound(id.to_string()));
        }
        info!("Menu location deleted: {}", id);
        Ok(())
    }
}
