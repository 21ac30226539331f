// ============================================================================
// CMS Core - Menu Location Entity
// File: crates/cms-core/src/domain/menu_location.rs
// Description: Named slot in a site layout that owns a menu forest
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use cms_shared::utils::{double_option, is_valid_slug, slugify};
use cms_shared::new_id;

fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if is_valid_slug(slug) {
        Ok(())
    } else {
        let mut error = ValidationError::new("slug");
        error.message = Some("Slug may only contain lowercase letters, digits and single dashes".into());
        Err(error)
    }
}

/// Menu Location entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MenuLocation {
    pub id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(max = 100, message = "Slug too long"), custom(function = "validate_slug"))]
    pub slug: String,

    #[validate(length(max = 1000, message = "Description too long"))]
    pub description: Option<String>,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMenuLocation {
    pub name: String,
    /// Derived from `name` when omitted
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuLocationChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl MenuLocation {
    pub fn new(draft: NewMenuLocation) -> Result<Self, validator::ValidationErrors> {
        let now = Utc::now();
        let name = draft.name.trim().to_string();
        let slug = match draft.slug {
            Some(slug) => slug.trim().to_string(),
            None => slugify(&name),
        };

        let location = Self {
            id: new_id(),
            name,
            slug,
            description: draft.description.map(|d| d.trim().to_string()),
            is_active: draft.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };

        location.validate()?;
        Ok(location)
    }

    pub fn apply_changes(&mut self, changes: MenuLocationChanges) -> Result<(), validator::ValidationErrors> {
        if let Some(name) = changes.name {
            self.name = name.trim().to_string();
        }
        if let Some(slug) = changes.slug {
            self.slug = slug.trim().to_string();
        }
        if let Some(description) = changes.description {
            self.description = description.map(|d| d.trim().to_string());
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
        self.updated_at = Utc::now();

        self.validate()
    }
}
