// ============================================================================
// CMS Core - Menu Item Service
// File: crates/cms-core/src/services/menu_item_service.rs
// ============================================================================
//! Menu item use cases: listing, depth-checked create/move, bulk reorder

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use cms_shared::constants::{MAX_BULK_ORDER_ITEMS, MAX_MENU_DEPTH};

use crate::domain::{MenuItem, MenuItemChanges, MenuLocation, NewMenuItem, OrderUpdate};
use crate::error::DomainError;
use crate::repositories::{MenuItemRepository, MenuLocationRepository};
use crate::tree::{assemble_tree, MenuForest, MenuTreeNode, MoveCheck, TreeError};

/// Items of one location, nested and flat
#[derive(Debug, Clone)]
pub struct MenuListing {
    pub tree: Vec<MenuTreeNode>,
    pub flat: Vec<MenuItem>,
}

pub struct MenuItemService {
    items: Arc<dyn MenuItemRepository>,
    locations: Arc<dyn MenuLocationRepository>,
}

impl MenuItemService {
    pub fn new(
        items: Arc<dyn MenuItemRepository>,
        locations: Arc<dyn MenuLocationRepository>,
    ) -> Self {
        Self { items, locations }
    }

    async fn require_location(&self, id: &Uuid) -> Result<MenuLocation, DomainError> {
        self.locations
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::MenuLocationNotFound(id.to_string()))
    }

    async fn require_item(&self, id: &Uuid) -> Result<MenuItem, DomainError> {
        self.items
            .find_by_id(id)
            .await?
            .ok_or(DomainError::MenuItemNotFound(*id))
    }

    /// Parent must exist and live in the same location as the child
    async fn require_parent(&self, location_id: &Uuid, parent_id: &Uuid) -> Result<(), DomainError> {
        let parent = self
            .items
            .find_by_id(parent_id)
            .await?
            .ok_or(DomainError::ParentNotFound(*parent_id))?;

        if parent.menu_location_id != *location_id {
            return Err(DomainError::ValidationError(
                "Parent menu item belongs to a different menu location".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn list_by_location(&self, location_id: &Uuid) -> Result<MenuListing, DomainError> {
        self.require_location(location_id).await?;

        let flat = self.items.find_by_location(location_id).await?;
        let tree = assemble_tree(flat.clone());
        debug!("Loaded {} menu items for location {}", flat.len(), location_id);

        Ok(MenuListing { tree, flat })
    }

    pub async fn get(&self, id: &Uuid) -> Result<MenuItem, DomainError> {
        self.require_item(id).await
    }

    /// Creates an item after checking the level it would land on
    pub async fn create(&self, draft: NewMenuItem) -> Result<MenuItem, DomainError> {
        info!("Creating menu item '{}' in location {}", draft.title.trim(), draft.menu_location_id);

        let location_id = draft.menu_location_id;
        self.require_location(&location_id).await?;
        if let Some(parent_id) = draft.parent_id {
            self.require_parent(&location_id, &parent_id).await?;
        }

        let existing = self.items.find_by_location(&location_id).await?;
        let forest = MenuForest::from_items(&existing);
        let depth = forest.depth_for_parent(draft.parent_id.as_ref())?;

        if depth > MAX_MENU_DEPTH {
            warn!(
                "Rejected menu item '{}': level {} exceeds max depth {}",
                draft.title.trim(),
                depth,
                MAX_MENU_DEPTH
            );
            return Err(DomainError::MaxDepthExceeded {
                depth,
                max: MAX_MENU_DEPTH,
            });
        }

        let sort_order = match draft.sort_order {
            Some(order) => order,
            None => next_sort_order(&existing, draft.parent_id),
        };

        let item = MenuItem::new(draft, sort_order)?;
        let created = self.items.create(&item).await?;

        info!("Menu item created: {} at level {}", created.id, depth);
        Ok(created)
    }

    async fn evaluate_move(
        &self,
        item: &MenuItem,
        new_parent: Option<&Uuid>,
    ) -> Result<MoveCheck, DomainError> {
        if let Some(parent_id) = new_parent {
            self.require_parent(&item.menu_location_id, parent_id).await?;
        }

        let items = self.items.find_by_location(&item.menu_location_id).await?;
        let forest = MenuForest::from_items(&items);
        Ok(forest.check_move(&item.id, new_parent)?)
    }

    /// Read-only move check, same rules as [`update`](Self::update)
    pub async fn check_move(&self, id: &Uuid, new_parent: Option<Uuid>) -> Result<MoveCheck, DomainError> {
        let item = self.require_item(id).await?;
        self.evaluate_move(&item, new_parent.as_ref()).await
    }

    /// Partial update. A present `parent_id` re-parents the item with its subtree.
    pub async fn update(&self, id: &Uuid, changes: MenuItemChanges) -> Result<MenuItem, DomainError> {
        let mut item = self.require_item(id).await?;

        if let Some(new_parent) = changes.parent_id {
            if new_parent != item.parent_id {
                let check = self.evaluate_move(&item, new_parent.as_ref()).await?;
                if !check.can_move {
                    let reason = check
                        .reason
                        .unwrap_or_else(|| "Menu item cannot be moved".to_string());
                    warn!("Rejected move of menu item {}: {}", id, reason);
                    return Err(DomainError::InvalidMove(reason));
                }
                info!("Moving menu item {} under {:?}", id, new_parent);
                item.parent_id = new_parent;
            }
        }

        item.apply_changes(changes)?;
        let updated = self.items.update(&item).await?;

        info!("Menu item updated: {}", updated.id);
        Ok(updated)
    }

    /// Deletes one row. Its children become roots.
    pub async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        if !self.items.delete(id).await? {
            return Err(DomainError::MenuItemNotFound(*id));
        }
        info!("Menu item deleted: {}", id);
        Ok(())
    }

    /// Validates the batch against the resulting trees, then persists it atomically.
    pub async fn bulk_update_order(&self, updates: Vec<OrderUpdate>) -> Result<u64, DomainError> {
        if updates.is_empty() {
            return Err(DomainError::ValidationError(
                "items must contain at least one entry".to_string(),
            ));
        }
        if updates.len() > MAX_BULK_ORDER_ITEMS {
            return Err(DomainError::ValidationError(format!(
                "items may contain at most {} entries",
                MAX_BULK_ORDER_ITEMS
            )));
        }

        let mut by_id: HashMap<Uuid, &OrderUpdate> = HashMap::with_capacity(updates.len());
        for update in &updates {
            if by_id.insert(update.id, update).is_some() {
                return Err(DomainError::ValidationError(format!(
                    "Duplicate menu item id in batch: {}",
                    update.id
                )));
            }
        }

        let ids: Vec<Uuid> = updates.iter().map(|u| u.id).collect();
        let existing = self.items.find_by_ids(&ids).await?;
        if let Some(missing) = ids.iter().find(|id| !existing.iter().any(|i| i.id == **id)) {
            return Err(DomainError::MenuItemNotFound(*missing));
        }

        let location_ids: HashSet<Uuid> = existing.iter().map(|i| i.menu_location_id).collect();
        for location_id in &location_ids {
            let items = self.items.find_by_location(location_id).await?;
            let in_location: HashSet<Uuid> = items.iter().map(|i| i.id).collect();

            let new_parents = existing
                .iter()
                .filter(|i| i.menu_location_id == *location_id)
                .filter_map(|i| by_id.get(&i.id).and_then(|u| u.parent_id).flatten());
            for parent_id in new_parents {
                if !in_location.contains(&parent_id) {
                    return Err(DomainError::ParentNotFound(parent_id));
                }
            }

            let forest = MenuForest::from_links(items.iter().map(|item| {
                let parent = match by_id.get(&item.id).and_then(|u| u.parent_id) {
                    Some(new_parent) => new_parent,
                    None => item.parent_id,
                };
                (item.id, parent)
            }));

            forest.validate().map_err(|e| match e {
                TreeError::Cycle(id) => DomainError::InvalidMove(format!(
                    "Reordering would create a cycle at menu item {}",
                    id
                )),
                other => other.into(),
            })?;
        }

        let updated = self.items.bulk_update_order(&updates).await?;
        info!("Bulk reorder applied to {} menu items", updated);
        Ok(updated)
    }
}

/// Saturates at `i32::MAX`; ties then fall back to `created_at`, which keeps the new item last.
fn next_sort_order(items: &[MenuItem], parent_id: Option<Uuid>) -> i32 {
    items
        .iter()
        .filter(|i| i.parent_id == parent_id)
        .map(|i| i.sort_order)
        .max()
        .map_or(0, |max| max.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LinkTarget, MenuItemType, NewMenuLocation};
    use crate::repositories::memory::InMemoryMenuStore;
    use crate::repositories::{MockMenuItemRepository, MockMenuLocationRepository};
    use chrono::Utc;

    struct Harness {
        store: Arc<InMemoryMenuStore>,
        service: MenuItemService,
        location_id: Uuid,
    }

    async fn harness() -> Harness {
        let store = Arc::new(InMemoryMenuStore::new());
        let location = MenuLocation::new(NewMenuLocation {
            name: "Header".to_string(),
            slug: None,
            description: None,
            is_active: None,
        })
        .unwrap();
        let location_id = location.id;
        store.seed(vec![location], Vec::new()).await;

        let service = MenuItemService::new(store.clone(), store.clone());
        Harness {
            store,
            service,
            location_id,
        }
    }

    fn draft(location_id: Uuid, title: &str, parent_id: Option<Uuid>) -> NewMenuItem {
        NewMenuItem {
            menu_location_id: location_id,
            parent_id,
            title: title.to_string(),
            url: None,
            sort_order: None,
            is_active: None,
            item_type: MenuItemType::Custom,
            target: LinkTarget::SameTab,
            rel: None,
            css_classes: None,
        }
    }

    fn move_to(parent_id: Option<Uuid>) -> MenuItemChanges {
        MenuItemChanges {
            parent_id: Some(parent_id),
            ..Default::default()
        }
    }

    /// Home > About > Team
    async fn three_levels(h: &Harness) -> (MenuItem, MenuItem, MenuItem) {
        let home = h.service.create(draft(h.location_id, "Home", None)).await.unwrap();
        let about = h
            .service
            .create(draft(h.location_id, "About", Some(home.id)))
            .await
            .unwrap();
        let team = h
            .service
            .create(draft(h.location_id, "Team", Some(about.id)))
            .await
            .unwrap();
        (home, about, team)
    }

    #[tokio::test]
    async fn test_create_up_to_three_levels() {
        let h = harness().await;
        let (home, about, team) = three_levels(&h).await;

        assert!(home.is_root());
        assert_eq!(about.parent_id, Some(home.id));
        assert_eq!(team.parent_id, Some(about.id));

        let listing = h.service.list_by_location(&h.location_id).await.unwrap();
        assert_eq!(listing.flat.len(), 3);
        assert_eq!(listing.tree.len(), 1);
        assert_eq!(listing.tree[0].children[0].children[0].item.id, team.id);
    }

    #[tokio::test]
    async fn test_create_fourth_level_rejected() {
        let h = harness().await;
        let (_, _, team) = three_levels(&h).await;

        let err = h
            .service
            .create(draft(h.location_id, "Bio", Some(team.id)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::MaxDepthExceeded { depth: 4, max: 3 }));
        assert!(err.to_string().contains("Maximum menu depth exceeded"));
        assert_eq!(h.store.item_count().await, 3);
    }

    #[tokio::test]
    async fn test_create_appends_sort_order() {
        let h = harness().await;
        let first = h.service.create(draft(h.location_id, "A", None)).await.unwrap();
        let second = h.service.create(draft(h.location_id, "B", None)).await.unwrap();
        let child = h
            .service
            .create(draft(h.location_id, "C", Some(first.id)))
            .await
            .unwrap();

        assert_eq!(first.sort_order, 0);
        assert_eq!(second.sort_order, 1);
        assert_eq!(child.sort_order, 0);
    }

    #[tokio::test]
    async fn test_create_appends_after_max_sort_order() {
        let h = harness().await;
        let mut pinned = draft(h.location_id, "Pinned", None);
        pinned.sort_order = Some(i32::MAX);
        h.service.create(pinned).await.unwrap();

        let appended = h.service.create(draft(h.location_id, "Appended", None)).await.unwrap();
        assert_eq!(appended.sort_order, i32::MAX);

        let listing = h.service.list_by_location(&h.location_id).await.unwrap();
        assert_eq!(listing.flat.last().map(|i| i.id), Some(appended.id));
    }

    #[tokio::test]
    async fn test_create_with_unknown_parent_or_location() {
        let h = harness().await;
        let ghost = Uuid::new_v4();

        let err = h
            .service
            .create(draft(h.location_id, "Lost", Some(ghost)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ParentNotFound(id) if id == ghost));

        let err = h.service.create(draft(ghost, "Lost", None)).await.unwrap_err();
        assert!(matches!(err, DomainError::MenuLocationNotFound(_)));
    }

    #[tokio::test]
    async fn test_parent_from_other_location_rejected() {
        let h = harness().await;
        let other = MenuLocation::new(NewMenuLocation {
            name: "Footer".to_string(),
            slug: None,
            description: None,
            is_active: None,
        })
        .unwrap();
        let other_id = other.id;
        h.store.seed(vec![other], Vec::new()).await;

        let foreign = h.service.create(draft(other_id, "Legal", None)).await.unwrap();
        let err = h
            .service
            .create(draft(h.location_id, "Home", Some(foreign.id)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_move_leaf_and_subtree() {
        let h = harness().await;
        let (home, about, team) = three_levels(&h).await;
        let blog = h.service.create(draft(h.location_id, "Blog", None)).await.unwrap();

        // leaf under a level-2 parent lands on level 3
        let moved = h.service.update(&blog.id, move_to(Some(about.id))).await.unwrap();
        assert_eq!(moved.parent_id, Some(about.id));

        // About carries Team: 1 + 2 - 1 = 2 levels below root is fine
        let moved = h.service.update(&about.id, move_to(None)).await.unwrap();
        assert!(moved.is_root());

        // Home now only has depth 1; putting About (depth 2 subtree) under Home works
        let moved = h.service.update(&about.id, move_to(Some(home.id))).await.unwrap();
        assert_eq!(moved.parent_id, Some(home.id));

        // Home cannot hang below its own grandchild
        let err = h
            .service
            .update(&home.id, move_to(Some(team.id)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidMove(_)));
    }

    #[tokio::test]
    async fn test_move_subtree_too_deep() {
        let h = harness().await;
        let (_, about, _) = three_levels(&h).await;
        let blog = h.service.create(draft(h.location_id, "Blog", None)).await.unwrap();
        let news = h
            .service
            .create(draft(h.location_id, "News", Some(blog.id)))
            .await
            .unwrap();

        // About (subtree depth 2) under News (level 2): 3 + 2 - 1 = 4
        let err = h
            .service
            .update(&about.id, move_to(Some(news.id)))
            .await
            .unwrap_err();
        match err {
            DomainError::InvalidMove(reason) => assert!(reason.contains("Maximum menu depth exceeded")),
            other => panic!("unexpected error: {other:?}"),
        }

        let check = h.service.check_move(&about.id, Some(news.id)).await.unwrap();
        assert!(!check.can_move);
        assert_eq!(check.total_depth, Some(4));
    }

    #[tokio::test]
    async fn test_move_under_own_descendant_rejected() {
        let h = harness().await;
        let (_, about, team) = three_levels(&h).await;

        let err = h
            .service
            .update(&about.id, move_to(Some(team.id)))
            .await
            .unwrap_err();
        match err {
            DomainError::InvalidMove(reason) => assert!(reason.contains("descendants")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_without_parent_change_skips_validation() {
        let h = harness().await;
        let (_, about, _) = three_levels(&h).await;

        let changes = MenuItemChanges {
            title: Some("About us".to_string()),
            parent_id: Some(about.parent_id),
            ..Default::default()
        };
        let updated = h.service.update(&about.id, changes).await.unwrap();
        assert_eq!(updated.title, "About us");
        assert_eq!(updated.parent_id, about.parent_id);
    }

    #[tokio::test]
    async fn test_update_missing_item() {
        let h = harness().await;
        let err = h
            .service
            .update(&Uuid::new_v4(), MenuItemChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::MenuItemNotFound(_)));
    }

    #[tokio::test]
    async fn test_corrupted_tree_reported() {
        let h = harness().await;
        let mut a = MenuItem::new(draft(h.location_id, "A", None), 0).unwrap();
        let b = MenuItem::new(draft(h.location_id, "B", Some(a.id)), 0).unwrap();
        a.parent_id = Some(b.id);
        let a_id = a.id;
        h.store.seed(Vec::new(), vec![a, b]).await;

        let err = h
            .service
            .create(draft(h.location_id, "C", Some(a_id)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::CorruptedTree(_)));
    }

    #[tokio::test]
    async fn test_delete_promotes_children() {
        let h = harness().await;
        let (home, about, _) = three_levels(&h).await;

        h.service.delete(&home.id).await.unwrap();
        let about = h.service.get(&about.id).await.unwrap();
        assert!(about.is_root());

        let err = h.service.delete(&home.id).await.unwrap_err();
        assert!(matches!(err, DomainError::MenuItemNotFound(_)));
    }

    #[tokio::test]
    async fn test_bulk_reorder() {
        let h = harness().await;
        let (home, about, team) = three_levels(&h).await;
        let blog = h.service.create(draft(h.location_id, "Blog", None)).await.unwrap();

        let updates = vec![
            OrderUpdate { id: blog.id, sort_order: 0, parent_id: None },
            OrderUpdate { id: home.id, sort_order: 1, parent_id: None },
            OrderUpdate { id: team.id, sort_order: 5, parent_id: Some(Some(home.id)) },
        ];
        assert_eq!(h.service.bulk_update_order(updates).await.unwrap(), 3);

        let team = h.service.get(&team.id).await.unwrap();
        assert_eq!(team.parent_id, Some(home.id));
        assert_eq!(team.sort_order, 5);
        let blog = h.service.get(&blog.id).await.unwrap();
        assert_eq!(blog.sort_order, 0);
        assert!(blog.is_root());
        assert_eq!(h.service.get(&about.id).await.unwrap().parent_id, Some(home.id));
    }

    #[tokio::test]
    async fn test_bulk_reorder_rejects_whole_batch() {
        let h = harness().await;
        let (home, about, team) = three_levels(&h).await;
        let deleted = h.service.create(draft(h.location_id, "Old", None)).await.unwrap();
        h.service.delete(&deleted.id).await.unwrap();

        let updates = vec![
            OrderUpdate { id: home.id, sort_order: 9, parent_id: None },
            OrderUpdate { id: about.id, sort_order: 9, parent_id: None },
            OrderUpdate { id: team.id, sort_order: 9, parent_id: Some(Some(deleted.id)) },
        ];
        let err = h.service.bulk_update_order(updates).await.unwrap_err();
        assert!(matches!(err, DomainError::ParentNotFound(id) if id == deleted.id));

        // nothing persisted
        assert_eq!(h.service.get(&home.id).await.unwrap().sort_order, 0);
        assert_eq!(h.service.get(&about.id).await.unwrap().sort_order, 0);
    }

    #[tokio::test]
    async fn test_bulk_reorder_depth_and_cycle() {
        let h = harness().await;
        let (home, about, team) = three_levels(&h).await;
        let blog = h.service.create(draft(h.location_id, "Blog", None)).await.unwrap();

        let too_deep = vec![OrderUpdate { id: blog.id, sort_order: 0, parent_id: Some(Some(team.id)) }];
        let err = h.service.bulk_update_order(too_deep).await.unwrap_err();
        assert!(matches!(err, DomainError::MaxDepthExceeded { depth: 4, .. }));

        let cycle = vec![
            OrderUpdate { id: home.id, sort_order: 0, parent_id: Some(Some(about.id)) },
        ];
        let err = h.service.bulk_update_order(cycle).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidMove(_)));
    }

    #[tokio::test]
    async fn test_bulk_reorder_input_checks() {
        let h = harness().await;
        let (home, _, _) = three_levels(&h).await;

        let err = h.service.bulk_update_order(Vec::new()).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));

        let dup = vec![
            OrderUpdate { id: home.id, sort_order: 0, parent_id: None },
            OrderUpdate { id: home.id, sort_order: 1, parent_id: None },
        ];
        let err = h.service.bulk_update_order(dup).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));

        let ghost = Uuid::new_v4();
        let missing = vec![OrderUpdate { id: ghost, sort_order: 0, parent_id: None }];
        let err = h.service.bulk_update_order(missing).await.unwrap_err();
        assert!(matches!(err, DomainError::MenuItemNotFound(id) if id == ghost));
    }

    #[tokio::test]
    async fn test_depth_violation_never_reaches_repository() {
        let location_id = Uuid::new_v4();
        let now = Utc::now();
        let location = MenuLocation {
            id: location_id,
            name: "Header".to_string(),
            slug: "header".to_string(),
            description: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let l1 = MenuItem::new(draft(location_id, "L1", None), 0).unwrap();
        let l2 = MenuItem::new(draft(location_id, "L2", Some(l1.id)), 0).unwrap();
        let l3 = MenuItem::new(draft(location_id, "L3", Some(l2.id)), 0).unwrap();
        let l3_id = l3.id;
        let parent = l3.clone();
        let rows = vec![l1, l2, l3];

        let mut locations = MockMenuLocationRepository::new();
        locations
            .expect_find_by_id()
            .returning(move |_| Ok(Some(location.clone())));

        let mut items = MockMenuItemRepository::new();
        items
            .expect_find_by_id()
            .returning(move |_| Ok(Some(parent.clone())));
        items
            .expect_find_by_location()
            .times(1)
            .returning(move |_| Ok(rows.clone()));
        items.expect_create().never();

        let service = MenuItemService::new(Arc::new(items), Arc::new(locations));
        let err = service
            .create(draft(location_id, "L4", Some(l3_id)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::MaxDepthExceeded { .. }));
    }

    #[tokio::test]
    async fn test_database_error_propagates() {
        let locations = MockMenuLocationRepository::new();
        let mut items = MockMenuItemRepository::new();
        items
            .expect_find_by_id()
            .returning(|_| Err(DomainError::DatabaseError("connection reset".to_string())));

        let service = MenuItemService::new(Arc::new(items), Arc::new(locations));
        let err = service.get(&Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::DatabaseError(_)));
    }
}
