use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    dao::models::{BingoItemEntity, ItemCategory},
    dto::validation::{validate_item_points, validate_item_text},
};

/// Payload used to create a new catalog item.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateItemRequest {
    /// Action text shown on the board cell (at most 200 characters).
    pub text: String,
    /// Category the action belongs to.
    pub category: ItemCategory,
    /// Display point value of the action.
    pub points: i64,
    /// Whether the item should immediately be eligible for new boards.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Validate for CreateItemRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_item_text(&self.text) {
            errors.add("text", e);
        }
        if let Err(e) = validate_item_points(self.points) {
            errors.add("points", e);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Payload used to update an existing catalog item. Omitted fields keep
/// their current value.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateItemRequest {
    /// New action text.
    #[serde(default)]
    pub text: Option<String>,
    /// New category.
    #[serde(default)]
    pub category: Option<ItemCategory>,
    /// New point value.
    #[serde(default)]
    pub points: Option<i64>,
    /// Soft-activation flag; deactivating keeps the item referenced by
    /// existing boards but excludes it from new ones.
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl Validate for UpdateItemRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(ref text) = self.text
            && let Err(e) = validate_item_text(text)
        {
            errors.add("text", e);
        }
        if let Some(points) = self.points
            && let Err(e) = validate_item_points(points)
        {
            errors.add("points", e);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Public projection of a catalog item.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemSummary {
    /// Stable identifier for the item.
    pub id: Uuid,
    /// Action text shown on the board cell.
    pub text: String,
    /// Category the action belongs to.
    pub category: ItemCategory,
    /// Display point value of the action.
    pub points: i64,
    /// Whether the item is eligible for new boards.
    pub is_active: bool,
}

impl From<BingoItemEntity> for ItemSummary {
    fn from(item: BingoItemEntity) -> Self {
        Self {
            id: item.id,
            text: item.text,
            category: item.category,
            points: item.points,
            is_active: item.is_active,
        }
    }
}

/// Response listing the active catalog.
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemsResponse {
    /// Active catalog items.
    pub items: Vec<ItemSummary>,
}

/// Outcome of re-seeding the default catalog.
#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogRefreshResponse {
    /// Number of default items written.
    pub items_seeded: usize,
}

/// Outcome of regenerating every player's board.
#[derive(Debug, Serialize, ToSchema)]
pub struct BoardsRefreshResponse {
    /// Number of game records that received a fresh board.
    pub boards_refreshed: usize,
}
