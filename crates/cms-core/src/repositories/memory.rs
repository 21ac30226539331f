//! In-memory repositories mirroring the PostgreSQL constraints
//! (foreign keys, unique slug, ON DELETE behavior, transactional bulk update).

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{MenuItem, MenuLocation, OrderUpdate};
use crate::error::DomainError;
use super::{MenuItemRepository, MenuLocationRepository};

#[derive(Default)]
struct StoreState {
    locations: Vec<MenuLocation>,
    items: Vec<MenuItem>,
}

impl StoreState {
    fn check_item_references(&self, item: &MenuItem) -> Result<(), DomainError> {
        if !self.locations.iter().any(|l| l.id == item.menu_location_id) {
            return Err(DomainError::ReferenceViolation(format!(
                "menu location {} does not exist",
                item.menu_location_id
            )));
        }
        if let Some(parent_id) = item.parent_id {
            if !self.items.iter().any(|i| i.id == parent_id) {
                return Err(DomainError::ReferenceViolation(format!(
                    "parent menu item {} does not exist",
                    parent_id
                )));
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryMenuStore {
    state: RwLock<StoreState>,
}

impl InMemoryMenuStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts rows as-is, skipping every check. Lets tests set up corrupted data.
    pub async fn seed(&self, locations: Vec<MenuLocation>, items: Vec<MenuItem>) {
        let mut state = self.state.write().await;
        state.locations.extend(locations);
        state.items.extend(items);
    }

    pub async fn item_count(&self) -> usize {
        self.state.read().await.items.len()
    }
}

#[async_trait]
impl MenuItemRepository for InMemoryMenuStore {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<MenuItem>, DomainError> {
        let state = self.state.read().await;
        Ok(state.items.iter().find(|i| i.id == *id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<MenuItem>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .items
            .iter()
            .filter(|i| ids.contains(&i.id))
            .cloned()
            .collect())
    }

    async fn find_by_location(&self, location_id: &Uuid) -> Result<Vec<MenuItem>, DomainError> {
        let state = self.state.read().await;
        let mut items: Vec<MenuItem> = state
            .items
            .iter()
            .filter(|i| i.menu_location_id == *location_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(items)
    }

    async fn create(&self, item: &MenuItem) -> Result<MenuItem, DomainError> {
        let mut state = self.state.write().await;
        state.check_item_references(item)?;
        state.items.push(item.clone());
        Ok(item.clone())
    }

    async fn update(&self, item: &MenuItem) -> Result<MenuItem, DomainError> {
        let mut state = self.state.write().await;
        state.check_item_references(item)?;
        let slot = state
            .items
            .iter_mut()
            .find(|i| i.id == item.id)
            .ok_or(DomainError::MenuItemNotFound(item.id))?;
        *slot = item.clone();
        Ok(item.clone())
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        let before = state.items.len();
        state.items.retain(|i| i.id != *id);
        if state.items.len() == before {
            return Ok(false);
        }
        for item in state.items.iter_mut().filter(|i| i.parent_id == Some(*id)) {
            item.parent_id = None;
        }
        Ok(true)
    }

    async fn bulk_update_order(&self, updates: &[OrderUpdate]) -> Result<u64, DomainError> {
        let mut state = self.state.write().await;

        // Validate the whole batch before touching anything
        for update in updates {
            if !state.items.iter().any(|i| i.id == update.id) {
                return Err(DomainError::MenuItemNotFound(update.id));
            }
            if let Some(Some(parent_id)) = update.parent_id {
                if !state.items.iter().any(|i| i.id == parent_id) {
                    return Err(DomainError::ReferenceViolation(format!(
                        "parent menu item {} does not exist",
                        parent_id
                    )));
                }
            }
        }

        let now = Utc::now();
        for update in updates {
            if let Some(item) = state.items.iter_mut().find(|i| i.id == update.id) {
                item.sort_order = update.sort_order;
                if let Some(parent_id) = update.parent_id {
                    item.parent_id = parent_id;
                }
                item.updated_at = now;
            }
        }

        Ok(updates.len() as u64)
    }
}

#[async_trait]
impl MenuLocationRepository for InMemoryMenuStore {
    async fn find_all(&self) -> Result<Vec<MenuLocation>, DomainError> {
        let state = self.state.read().await;
        let mut locations = state.locations.clone();
        locations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(locations)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<MenuLocation>, DomainError> {
        let state = self.state.read().await;
        Ok(state.locations.iter().find(|l| l.id == *id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<MenuLocation>, DomainError> {
        let state = self.state.read().await;
        Ok(state.locations.iter().find(|l| l.slug == slug).cloned())
    }

    async fn create(&self, location: &MenuLocation) -> Result<MenuLocation, DomainError> {
        let mut state = self.state.write().await;
        if state.locations.iter().any(|l| l.slug == location.slug) {
            return Err(DomainError::SlugAlreadyExists(location.slug.clone()));
        }
        state.locations.push(location.clone());
        Ok(location.clone())
    }

    async fn update(&self, location: &MenuLocation) -> Result<MenuLocation, DomainError> {
        let mut state = self.state.write().await;
        if state
            .locations
            .iter()
            .any(|l| l.slug == location.slug && l.id != location.id)
        {
            return Err(DomainError::SlugAlreadyExists(location.slug.clone()));
        }
        let slot = state
            .locations
            .iter_mut()
            .find(|l| l.id == location.id)
            .ok_or_else(|| DomainError::MenuLocationNotFound(location.id.to_string()))?;
        *slot = location.clone();
        Ok(location.clone())
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        let before = state.locations.len();
        state.locations.retain(|l| l.id != *id);
        if state.locations.len() == before {
            return Ok(false);
        }
        state.items.retain(|i| i.menu_location_id != *id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LinkTarget, MenuItemType, NewMenuItem, NewMenuLocation};

    fn location() -> MenuLocation {
        MenuLocation::new(NewMenuLocation {
            name: "Footer".to_string(),
            slug: None,
            description: None,
            is_active: None,
        })
        .unwrap()
    }

    fn item(location_id: Uuid, title: &str, sort_order: i32) -> MenuItem {
        MenuItem::new(
            NewMenuItem {
                menu_location_id: location_id,
                parent_id: None,
                title: title.to_string(),
                url: None,
                sort_order: None,
                is_active: None,
                item_type: MenuItemType::Custom,
                target: LinkTarget::SameTab,
                rel: None,
                css_classes: None,
            },
            sort_order,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_bulk_update_order_is_all_or_nothing() {
        let store = InMemoryMenuStore::new();
        let footer = location();
        let items: Vec<MenuItem> = (0..5)
            .map(|n| item(footer.id, &format!("Link {}", n), n))
            .collect();
        let gone = item(footer.id, "Gone", 9);
        let mut seeded = items.clone();
        seeded.push(gone.clone());
        store.seed(vec![footer], seeded).await;
        assert!(MenuItemRepository::delete(&store, &gone.id).await.unwrap());

        let mut updates: Vec<OrderUpdate> = items
            .iter()
            .map(|i| OrderUpdate {
                id: i.id,
                sort_order: 10 - i.sort_order,
                parent_id: None,
            })
            .collect();
        updates[2].parent_id = Some(Some(gone.id));

        let err = store.bulk_update_order(&updates).await.unwrap_err();
        assert!(matches!(err, DomainError::ReferenceViolation(_)));

        for original in &items {
            let stored = MenuItemRepository::find_by_id(&store, &original.id)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(stored.sort_order, original.sort_order);
            assert_eq!(stored.parent_id, None);
        }
    }

    #[tokio::test]
    async fn test_delete_item_promotes_children() {
        let store = InMemoryMenuStore::new();
        let footer = location();
        let parent = item(footer.id, "Parent", 0);
        let mut child = item(footer.id, "Child", 0);
        child.parent_id = Some(parent.id);
        store.seed(vec![footer], vec![parent.clone(), child.clone()]).await;

        assert!(MenuItemRepository::delete(&store, &parent.id).await.unwrap());
        let child = MenuItemRepository::find_by_id(&store, &child.id)
            .await
            .unwrap()
            .unwrap();
        assert!(child.parent_id.is_none());
    }
}
