// ============================================================================
// CMS Infrastructure - PostgreSQL Menu Location Repository
// File: crates/cms-infrastructure/src/database/postgres/menu_location_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::warn;
use uuid::Uuid;

use cms_core::domain::MenuLocation;
use cms_core::error::DomainError;
use cms_core::repositories::MenuLocationRepository;

use super::db_error;

pub struct PgMenuLocationRepository {
    pool: PgPool,
}

impl PgMenuLocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct MenuLocationRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MenuLocationRow> for MenuLocation {
    fn from(row: MenuLocationRow) -> Self {
        MenuLocation {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// The unique index on `slug` is the last line of defence against two
/// concurrent writers claiming the same slug.
fn write_error(context: &str, slug: &str, e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            warn!("Menu location slug already exists: {}", slug);
            return DomainError::SlugAlreadyExists(slug.to_string());
        }
    }
    db_error(context, e)
}

#[async_trait]
impl MenuLocationRepository for PgMenuLocationRepository {
    async fn find_all(&self) -> Result<Vec<MenuLocation>, DomainError> {
        let rows: Vec<MenuLocationRow> = sqlx::query_as(
            r#"
            SELECT id, name, slug, description, is_active, created_at, updated_at
            FROM menu_locations
            ORDER BY name ASC
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing menu locations", e))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<MenuLocation>, DomainError> {
        let row: Option<MenuLocationRow> = sqlx::query_as(
            r#"
            SELECT id, name, slug, description, is_active, created_at, updated_at
            FROM menu_locations
            WHERE id = $1
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding menu location by id", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<MenuLocation>, DomainError> {
        let row: Option<MenuLocationRow> = sqlx::query_as(
            r#"
            SELECT id, name, slug, description, is_active, created_at, updated_at
            FROM menu_locations
            WHERE slug = $1
            "#
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding menu location by slug", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn create(&self, location: &MenuLocation) -> Result<MenuLocation, DomainError> {
        let row: MenuLocationRow = sqlx::query_as(
            r#"
            INSERT INTO menu_locations (id, name, slug, description, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, slug, description, is_active, created_at, updated_at
            "#
        )
        .bind(location.id)
        .bind(&location.name)
        .bind(&location.slug)
        .bind(&location.description)
        .bind(location.is_active)
        .bind(location.created_at)
        .bind(location.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("creating menu location", &location.slug, e))?;

        Ok(row.into())
    }

    async fn update(&self, location: &MenuLocation) -> Result<MenuLocation, DomainError> {
        let row: Option<MenuLocationRow> = sqlx::query_as(
            r#"
            UPDATE menu_locations
            SET name = $2, slug = $3, description = $4, is_active = $5, updated_at = $6
            WHERE id = $1
            RETURNING id, name, slug, description, is_active, created_at, updated_at
            "#
        )
        .bind(location.id)
        .bind(&location.name)
        .bind(&location.slug)
        .bind(&location.description)
        .bind(location.is_active)
        .bind(location.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error("updating menu location", &location.slug, e))?;

        row.map(|r| r.into())
            .ok_or_else(|| DomainError::MenuLocationNotFound(location.id.to_string()))
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, DomainError> {
        // menu_items rows go with it (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM menu_locations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting menu location", e))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_conversion() {
        let now = Utc::now();
        let location: MenuLocation = MenuLocationRow {
            id: Uuid::new_v4(),
            name: "Header".to_string(),
            slug: "header".to_string(),
            description: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
        .into();

        assert_eq!(location.slug, "header");
        assert!(location.is_active);
    }

    #[test]
    fn test_non_database_error_is_not_a_slug_clash() {
        let err = write_error("creating menu location", "header", sqlx::Error::RowNotFound);
        assert!(matches!(err, DomainError::DatabaseError(_)));
    }
}
