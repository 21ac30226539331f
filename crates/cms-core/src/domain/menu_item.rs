// ============================================================================
// CMS Core - Menu Item Entity
// File: crates/cms-core/src/domain/menu_item.rs
// Description: Navigation entry, one node of a menu location forest
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use cms_shared::constants::DEFAULT_MENU_URL;
use cms_shared::utils::double_option;
use cms_shared::new_id;

/// What a menu item links to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuItemType {
    Custom,
    Page,
    Post,
    Category,
    Product,
}

impl MenuItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuItemType::Custom => "custom",
            MenuItemType::Page => "page",
            MenuItemType::Post => "post",
            MenuItemType::Category => "category",
            MenuItemType::Product => "product",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "custom" => Some(MenuItemType::Custom),
            "page" => Some(MenuItemType::Page),
            "post" => Some(MenuItemType::Post),
            "category" => Some(MenuItemType::Category),
            "product" => Some(MenuItemType::Product),
            _ => None,
        }
    }
}

impl Default for MenuItemType {
    fn default() -> Self {
        MenuItemType::Custom
    }
}

/// Browsing context the link opens in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkTarget {
    #[serde(rename = "_self")]
    SameTab,
    #[serde(rename = "_blank")]
    NewTab,
}

impl LinkTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkTarget::SameTab => "_self",
            LinkTarget::NewTab => "_blank",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "_self" => Some(LinkTarget::SameTab),
            "_blank" => Some(LinkTarget::NewTab),
            _ => None,
        }
    }
}

impl Default for LinkTarget {
    fn default() -> Self {
        LinkTarget::SameTab
    }
}

/// Menu Item entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MenuItem {
    pub id: Uuid,
    pub menu_location_id: Uuid,
    pub parent_id: Option<Uuid>,

    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 2048, message = "URL must be between 1 and 2048 characters"))]
    pub url: String,

    pub sort_order: i32,
    pub is_active: bool,

    #[serde(rename = "type")]
    pub item_type: MenuItemType,
    pub target: LinkTarget,

    #[validate(length(max = 255, message = "Rel too long"))]
    pub rel: Option<String>,

    #[validate(length(max = 255, message = "CSS classes too long"))]
    pub css_classes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a menu item
#[derive(Debug, Clone, Deserialize)]
pub struct NewMenuItem {
    pub menu_location_id: Uuid,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    /// Appended after the existing siblings when omitted
    #[serde(default)]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(rename = "type", default)]
    pub item_type: MenuItemType,
    #[serde(default)]
    pub target: LinkTarget,
    #[serde(default)]
    pub rel: Option<String>,
    #[serde(default)]
    pub css_classes: Option<String>,
}

/// Partial update. `parent_id: Some(None)` moves the item to the root level.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuItemChanges {
    pub title: Option<String>,
    pub url: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<Uuid>>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
    #[serde(rename = "type")]
    pub item_type: Option<MenuItemType>,
    pub target: Option<LinkTarget>,
    #[serde(default, deserialize_with = "double_option")]
    pub rel: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub css_classes: Option<Option<String>>,
}

/// One entry of a bulk reorder request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub id: Uuid,
    pub sort_order: i32,
    /// Absent keeps the current parent, `null` moves to the root level
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<Uuid>>,
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn clean_url(url: Option<String>) -> String {
    clean_optional(url).unwrap_or_else(|| DEFAULT_MENU_URL.to_string())
}

impl MenuItem {
    pub fn new(draft: NewMenuItem, sort_order: i32) -> Result<Self, validator::ValidationErrors> {
        let now = Utc::now();
        let item = Self {
            id: new_id(),
            menu_location_id: draft.menu_location_id,
            parent_id: draft.parent_id,
            title: draft.title.trim().to_string(),
            url: clean_url(draft.url),
            sort_order,
            is_active: draft.is_active.unwrap_or(true),
            item_type: draft.item_type,
            target: draft.target,
            rel: clean_optional(draft.rel),
            css_classes: clean_optional(draft.css_classes),
            created_at: now,
            updated_at: now,
        };

        item.validate()?;
        Ok(item)
    }

    /// Applies every field except `parent_id`, which goes through move validation.
    pub fn apply_changes(&mut self, changes: MenuItemChanges) -> Result<(), validator::ValidationErrors> {
        if let Some(title) = changes.title {
            self.title = title.trim().to_string();
        }
        if let Some(url) = changes.url {
            self.url = clean_url(Some(url));
        }
        if let Some(sort_order) = changes.sort_order {
            self.sort_order = sort_order;
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
        if let Some(item_type) = changes.item_type {
            self.item_type = item_type;
        }
        if let Some(target) = changes.target {
            self.target = target;
        }
        if let Some(rel) = changes.rel {
            self.rel = clean_optional(rel);
        }
        if let Some(css_classes) = changes.css_classes {
            self.css_classes = clean_optional(css_classes);
        }
        self.updated_at = Utc::now();

        self.validate()
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> NewMenuItem {
        NewMenuItem {
            menu_location_id: Uuid::new_v4(),
            parent_id: None,
            title: title.to_string(),
            url: None,
            sort_order: None,
            is_active: None,
            item_type: MenuItemType::default(),
            target: LinkTarget::default(),
            rel: Some("  ".to_string()),
            css_classes: None,
        }
    }

    #[test]
    fn test_create_menu_item() {
        let item = MenuItem::new(draft("  Home "), 0).unwrap();
        assert_eq!(item.title, "Home");
        assert_eq!(item.url, "#");
        assert!(item.is_active);
        assert!(item.is_root());
        assert_eq!(item.rel, None);
        assert_eq!(item.item_type, MenuItemType::Custom);
        assert_eq!(item.target, LinkTarget::SameTab);
    }

    #[test]
    fn test_empty_title_rejected() {
        assert!(MenuItem::new(draft("   "), 0).is_err());
    }

    #[test]
    fn test_apply_changes_leaves_parent_alone() {
        let mut item = MenuItem::new(draft("Home"), 0).unwrap();
        let changes: MenuItemChanges = serde_json::from_str(
            r#"{"title": "Start", "parent_id": null, "type": "page", "target": "_blank", "rel": "noopener"}"#,
        )
        .unwrap();
        assert_eq!(changes.parent_id, Some(None));

        item.apply_changes(changes).unwrap();
        assert_eq!(item.title, "Start");
        assert_eq!(item.item_type, MenuItemType::Page);
        assert_eq!(item.target, LinkTarget::NewTab);
        assert_eq!(item.rel.as_deref(), Some("noopener"));
        assert!(item.is_root());
    }

    #[test]
    fn test_serialized_type_field() {
        let item = MenuItem::new(draft("Home"), 0).unwrap();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "custom");
        assert_eq!(json["target"], "_self");
    }

    #[test]
    fn test_enum_round_trip_strings() {
        assert_eq!(MenuItemType::from_str("PAGE"), Some(MenuItemType::Page));
        assert_eq!(MenuItemType::from_str("unknown"), None);
        assert_eq!(LinkTarget::from_str(LinkTarget::NewTab.as_str()), Some(LinkTarget::NewTab));
    }
}
