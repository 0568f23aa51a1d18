//! Catalog item management and default-catalog seeding.

use std::sync::Arc;
use std::time::SystemTime;

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{
        game_store::GameStore,
        models::{BingoItemEntity, ItemCategory},
    },
    dto::catalog::{
        CatalogRefreshResponse, CreateItemRequest, ItemSummary, ItemsResponse, UpdateItemRequest,
    },
    error::ServiceError,
    state::SharedState,
};

/// Namespace under which default catalog items derive their ids, so
/// re-seeding upserts rather than duplicates.
const DEFAULT_CATALOG_NAMESPACE: Uuid = Uuid::from_u128(0x8f2e_6a74_1c09_4bd3_9e5a_27d8_40b1_66c5);

/// Author recorded on seeded items.
const SYSTEM_AUTHOR: &str = "system";

/// Built-in catalog of sustainability actions shipped with the binary.
///
/// Large enough (24 entries) to fill boards on a fresh deployment and spread
/// across every category so the easy-item policy always has material.
const DEFAULT_CATALOG: &[(&str, ItemCategory, i64)] = &[
    ("Cycle or walk to the venue", ItemCategory::Transport, 20),
    ("Take public transport instead of a car", ItemCategory::Transport, 15),
    ("Organise a shared ride home", ItemCategory::Transport, 15),
    ("Take the stairs instead of the lift", ItemCategory::Transport, 5),
    ("Switch off lights in an empty room", ItemCategory::Energy, 5),
    ("Unplug chargers that are not in use", ItemCategory::Energy, 5),
    ("Lower a radiator by one degree", ItemCategory::Energy, 10),
    ("Run a device on battery-saver for a day", ItemCategory::Energy, 10),
    ("Recycle your waste at the sorting station", ItemCategory::Waste, 10),
    ("Bring a zero-waste lunch", ItemCategory::Waste, 20),
    ("Reuse a cup instead of taking a new one", ItemCategory::Waste, 5),
    ("Compost your food scraps", ItemCategory::Waste, 15),
    ("Refill a water bottle instead of buying one", ItemCategory::Water, 5),
    ("Take a shorter shower", ItemCategory::Water, 10),
    ("Report or fix a dripping tap", ItemCategory::Water, 15),
    ("Eat a fully plant-based meal", ItemCategory::Food, 15),
    ("Choose a locally sourced snack", ItemCategory::Food, 10),
    ("Rescue food that would have been thrown away", ItemCategory::Food, 20),
    ("Join the community clean-up walk", ItemCategory::Community, 25),
    ("Introduce a colleague to the bingo board", ItemCategory::Community, 10),
    ("Share a sustainability tip at your table", ItemCategory::Community, 10),
    ("Delete old emails and empty the trash folder", ItemCategory::Digital, 5),
    ("Stream in standard definition for a day", ItemCategory::Digital, 10),
    ("Set your search engine to an eco-friendly one", ItemCategory::General, 5),
];

/// List the items currently eligible for new boards.
pub async fn list_active_items(state: &SharedState) -> Result<ItemsResponse, ServiceError> {
    let store = state.require_game_store().await?;
    let items = store.list_items(true).await?;
    Ok(ItemsResponse {
        items: items.into_iter().map(Into::into).collect(),
    })
}

/// Create a catalog item on behalf of an admin.
pub async fn create_item(
    state: &SharedState,
    created_by: &str,
    request: CreateItemRequest,
) -> Result<ItemSummary, ServiceError> {
    let store = state.require_game_store().await?;
    let now = SystemTime::now();

    let item = BingoItemEntity {
        id: Uuid::new_v4(),
        text: request.text,
        category: request.category,
        points: request.points,
        is_active: request.is_active,
        created_by: created_by.to_owned(),
        created_at: now,
        updated_at: now,
    };
    store.save_item(item.clone()).await?;

    info!(item_id = %item.id, created_by, "catalog item created");
    Ok(item.into())
}

/// Apply a partial update to an existing catalog item.
///
/// Items referenced by boards are never deleted; deactivation via
/// `is_active` is the only way to retire one.
pub async fn update_item(
    state: &SharedState,
    id: Uuid,
    request: UpdateItemRequest,
) -> Result<ItemSummary, ServiceError> {
    let store = state.require_game_store().await?;

    let Some(mut item) = store.find_item(id).await? else {
        return Err(ServiceError::ItemNotFound(id));
    };

    if let Some(text) = request.text {
        item.text = text;
    }
    if let Some(category) = request.category {
        item.category = category;
    }
    if let Some(points) = request.points {
        item.points = points;
    }
    if let Some(is_active) = request.is_active {
        item.is_active = is_active;
    }
    item.updated_at = SystemTime::now();

    store.save_item(item.clone()).await?;
    Ok(item.into())
}

/// Re-seed the built-in default catalog.
///
/// Default item ids are derived from their text, so repeated runs upsert the
/// same documents instead of growing the catalog.
pub async fn refresh_catalog(state: &SharedState) -> Result<CatalogRefreshResponse, ServiceError> {
    let store = state.require_game_store().await?;
    let items_seeded = seed_default_catalog(&store).await?;
    Ok(CatalogRefreshResponse { items_seeded })
}

/// Seed the default catalog when the items collection is empty (fresh
/// deployment), so boards can be handed out immediately.
pub async fn ensure_default_catalog(store: &Arc<dyn GameStore>) -> Result<(), ServiceError> {
    if store.list_items(false).await?.is_empty() {
        let seeded = seed_default_catalog(store).await?;
        info!(seeded, "seeded default catalog on first boot");
    }
    Ok(())
}

/// Write every default item, returning how many were written.
pub async fn seed_default_catalog(store: &Arc<dyn GameStore>) -> Result<usize, ServiceError> {
    let now = SystemTime::now();
    for (text, category, points) in DEFAULT_CATALOG {
        let item = BingoItemEntity {
            id: Uuid::new_v5(&DEFAULT_CATALOG_NAMESPACE, text.as_bytes()),
            text: (*text).to_owned(),
            category: *category,
            points: *points,
            is_active: true,
            created_by: SYSTEM_AUTHOR.to_owned(),
            created_at: now,
            updated_at: now,
        };
        store.save_item(item).await?;
    }

    Ok(DEFAULT_CATALOG.len())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::game::patterns::BOARD_CELLS;

    #[test]
    fn default_catalog_can_fill_a_board() {
        assert!(DEFAULT_CATALOG.len() >= BOARD_CELLS);
    }

    #[test]
    fn default_catalog_texts_are_unique() {
        // Ids derive from the text; duplicates would silently collapse.
        let texts = DEFAULT_CATALOG
            .iter()
            .map(|(text, _, _)| *text)
            .collect::<HashSet<_>>();
        assert_eq!(texts.len(), DEFAULT_CATALOG.len());
    }

    #[test]
    fn default_catalog_points_are_valid() {
        assert!(DEFAULT_CATALOG.iter().all(|(_, _, points)| *points >= 0));
    }
}
