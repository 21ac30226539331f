// ============================================================================
// CMS Infrastructure - PostgreSQL Menu Item Repository
// File: crates/cms-infrastructure/src/database/postgres/menu_item_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{info, warn};
use uuid::Uuid;

use cms_core::domain::{LinkTarget, MenuItem, MenuItemType, OrderUpdate};
use cms_core::error::DomainError;
use cms_core::repositories::MenuItemRepository;

use super::db_error;

pub struct PgMenuItemRepository {
    pool: PgPool,
}

impl PgMenuItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct MenuItemRow {
    pub id: Uuid,
    pub menu_location_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub title: String,
    pub url: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub item_type: String,
    pub target: String,
    pub rel: Option<String>,
    pub css_classes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        MenuItem {
            id: row.id,
            menu_location_id: row.menu_location_id,
            parent_id: row.parent_id,
            title: row.title,
            url: row.url,
            sort_order: row.sort_order,
            is_active: row.is_active,
            item_type: MenuItemType::from_str(&row.item_type).unwrap_or_default(),
            target: LinkTarget::from_str(&row.target).unwrap_or_default(),
            rel: row.rel,
            css_classes: row.css_classes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl MenuItemRepository for PgMenuItemRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<MenuItem>, DomainError> {
        let row: Option<MenuItemRow> = sqlx::query_as(
            r#"
            SELECT
                id, menu_location_id, parent_id, title, url,
                sort_order, is_active, item_type, target, rel, css_classes,
                created_at, updated_at
            FROM menu_items
            WHERE id = $1
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding menu item by id", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<MenuItem>, DomainError> {
        let rows: Vec<MenuItemRow> = sqlx::query_as(
            r#"
            SELECT
                id, menu_location_id, parent_id, title, url,
                sort_order, is_active, item_type, target, rel, css_classes,
                created_at, updated_at
            FROM menu_items
            WHERE id = ANY($1)
            "#
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("finding menu items by ids", e))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn find_by_location(&self, location_id: &Uuid) -> Result<Vec<MenuItem>, DomainError> {
        let rows: Vec<MenuItemRow> = sqlx::query_as(
            r#"
            SELECT
                id, menu_location_id, parent_id, title, url,
                sort_order, is_active, item_type, target, rel, css_classes,
                created_at, updated_at
            FROM menu_items
            WHERE menu_location_id = $1
            ORDER BY sort_order ASC, created_at ASC
            "#
        )
        .bind(location_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing menu items by location", e))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn create(&self, item: &MenuItem) -> Result<MenuItem, DomainError> {
        let row: MenuItemRow = sqlx::query_as(
            r#"
            INSERT INTO menu_items (
                id, menu_location_id, parent_id, title, url,
                sort_order, is_active, item_type, target, rel, css_classes,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING
                id, menu_location_id, parent_id, title, url,
                sort_order, is_active, item_type, target, rel, css_classes,
                created_at, updated_at
            "#
        )
        .bind(item.id)
        .bind(item.menu_location_id)
        .bind(item.parent_id)
        .bind(&item.title)
        .bind(&item.url)
        .bind(item.sort_order)
        .bind(item.is_active)
        .bind(item.item_type.as_str())
        .bind(item.target.as_str())
        .bind(&item.rel)
        .bind(&item.css_classes)
        .bind(item.created_at)
        .bind(item.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("creating menu item", e))?;

        Ok(row.into())
    }

    async fn update(&self, item: &MenuItem) -> Result<MenuItem, DomainError> {
        let row: Option<MenuItemRow> = sqlx::query_as(
            r#"
            UPDATE menu_items
            SET
                parent_id = $2,
                title = $3,
                url = $4,
                sort_order = $5,
                is_active = $6,
                item_type = $7,
                target = $8,
                rel = $9,
                css_classes = $10,
                updated_at = $11
            WHERE id = $1
            RETURNING
                id, menu_location_id, parent_id, title, url,
                sort_order, is_active, item_type, target, rel, css_classes,
                created_at, updated_at
            "#
        )
        .bind(item.id)
        .bind(item.parent_id)
        .bind(&item.title)
        .bind(&item.url)
        .bind(item.sort_order)
        .bind(item.is_active)
        .bind(item.item_type.as_str())
        .bind(item.target.as_str())
        .bind(&item.rel)
        .bind(&item.css_classes)
        .bind(item.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("updating menu item", e))?;

        row.map(|r| r.into()).ok_or(DomainError::MenuItemNotFound(item.id))
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, DomainError> {
        // parent_id of the children is cleared by ON DELETE SET NULL
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting menu item", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn bulk_update_order(&self, updates: &[OrderUpdate]) -> Result<u64, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("starting bulk reorder transaction", e))?;

        let mut updated = 0;
        for update in updates {
            let query = match update.parent_id {
                Some(parent_id) => sqlx::query(
                    r#"
                    UPDATE menu_items
                    SET sort_order = $2, parent_id = $3, updated_at = NOW()
                    WHERE id = $1
                    "#
                )
                .bind(update.id)
                .bind(update.sort_order)
                .bind(parent_id),
                None => sqlx::query(
                    r#"
                    UPDATE menu_items
                    SET sort_order = $2, updated_at = NOW()
                    WHERE id = $1
                    "#
                )
                .bind(update.id)
                .bind(update.sort_order),
            };

            // An early return drops `tx`, which rolls the whole batch back
            let result = query
                .execute(&mut *tx)
                .await
                .map_err(|e| db_error("applying bulk reorder", e))?;

            if result.rows_affected() == 0 {
                warn!("Bulk reorder aborted: menu item {} not found", update.id);
                return Err(DomainError::MenuItemNotFound(update.id));
            }
            updated += result.rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| db_error("committing bulk reorder", e))?;

        info!("Bulk reorder committed for {} menu items", updated);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(item_type: &str, target: &str) -> MenuItemRow {
        MenuItemRow {
            id: Uuid::new_v4(),
            menu_location_id: Uuid::new_v4(),
            parent_id: None,
            title: "Home".to_string(),
            url: "/".to_string(),
            sort_order: 0,
            is_active: true,
            item_type: item_type.to_string(),
            target: target.to_string(),
            rel: None,
            css_classes: Some("nav-home".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_conversion() {
        let item: MenuItem = row("page", "_blank").into();
        assert_eq!(item.item_type, MenuItemType::Page);
        assert_eq!(item.target, LinkTarget::NewTab);
        assert_eq!(item.css_classes.as_deref(), Some("nav-home"));
    }

    #[test]
    fn test_unknown_enum_values_fall_back() {
        let item: MenuItem = row("legacy", "_parent").into();
        assert_eq!(item.item_type, MenuItemType::Custom);
        assert_eq!(item.target, LinkTarget::SameTab);
    }

    #[sqlx::test(migrator = "crate::database::migrations::MIGRATOR")]
    #[ignore = "needs a PostgreSQL server in DATABASE_URL"]
    async fn test_bulk_update_order_rolls_back_on_failed_row(pool: PgPool) {
        use crate::database::postgres::PgMenuLocationRepository;
        use cms_core::domain::{MenuLocation, NewMenuItem, NewMenuLocation};
        use cms_core::repositories::MenuLocationRepository;

        let locations = PgMenuLocationRepository::new(pool.clone());
        let items = PgMenuItemRepository::new(pool);

        let footer = MenuLocation::new(NewMenuLocation {
            name: "Footer".to_string(),
            slug: None,
            description: None,
            is_active: None,
        })
        .unwrap();
        locations.create(&footer).await.unwrap();

        let mut created = Vec::new();
        for n in 0..5 {
            let item = MenuItem::new(
                NewMenuItem {
                    menu_location_id: footer.id,
                    parent_id: None,
                    title: format!("Link {}", n),
                    url: None,
                    sort_order: None,
                    is_active: None,
                    item_type: MenuItemType::Custom,
                    target: LinkTarget::SameTab,
                    rel: None,
                    css_classes: None,
                },
                n,
            )
            .unwrap();
            created.push(items.create(&item).await.unwrap());
        }

        let mut updates: Vec<OrderUpdate> = created
            .iter()
            .map(|i| OrderUpdate {
                id: i.id,
                sort_order: 10 - i.sort_order,
                parent_id: None,
            })
            .collect();
        updates[2].parent_id = Some(Some(Uuid::new_v4()));

        let err = items.bulk_update_order(&updates).await.unwrap_err();
        assert!(matches!(err, DomainError::ReferenceViolation(_)));

        let stored = items.find_by_location(&footer.id).await.unwrap();
        for (original, stored) in created.iter().zip(stored.iter()) {
            assert_eq!(stored.id, original.id);
            assert_eq!(stored.sort_order, original.sort_order);
        }
    }
}
