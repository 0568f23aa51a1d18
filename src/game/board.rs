//! Board generation from the active item catalog.

use rand::Rng;
use rand::seq::index;
use thiserror::Error;

use crate::dao::models::{BingoItemEntity, BoardEntryEntity};
use crate::game::patterns::BOARD_CELLS;

/// The active catalog is too small to fill a board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("board generation needs at least {BOARD_CELLS} active items (got {available})")]
pub struct InsufficientCatalog {
    /// Number of active items that were available.
    pub available: usize,
}

/// Draw a fresh 16-cell board from the active catalog.
///
/// Samples 16 distinct items uniformly without replacement and assigns them
/// to positions `0..16` in the sampled order. Pure given its random source;
/// successive calls are expected to differ.
pub fn generate(
    active_items: &[BingoItemEntity],
    rng: &mut impl Rng,
) -> Result<Vec<BoardEntryEntity>, InsufficientCatalog> {
    if active_items.len() < BOARD_CELLS {
        return Err(InsufficientCatalog {
            available: active_items.len(),
        });
    }

    let sampled = index::sample(rng, active_items.len(), BOARD_CELLS);
    Ok(sampled
        .iter()
        .enumerate()
        .map(|(position, item_index)| BoardEntryEntity {
            item_id: active_items[item_index].id,
            position: position as u8,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::time::SystemTime;

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use uuid::Uuid;

    use super::*;
    use crate::dao::models::ItemCategory;

    fn catalog(len: usize) -> Vec<BingoItemEntity> {
        (0..len)
            .map(|index| BingoItemEntity {
                id: Uuid::new_v4(),
                text: format!("action {index}"),
                category: ItemCategory::General,
                points: 10,
                is_active: true,
                created_by: "system".into(),
                created_at: SystemTime::UNIX_EPOCH,
                updated_at: SystemTime::UNIX_EPOCH,
            })
            .collect()
    }

    #[test]
    fn board_covers_all_positions_exactly_once() {
        let items = catalog(30);
        let mut rng = StdRng::seed_from_u64(7);

        let board = generate(&items, &mut rng).unwrap();
        assert_eq!(board.len(), BOARD_CELLS);

        let positions = board.iter().map(|entry| entry.position).collect::<HashSet<_>>();
        assert_eq!(positions, (0u8..16).collect::<HashSet<_>>());
    }

    #[test]
    fn board_items_are_distinct_and_from_the_catalog() {
        let items = catalog(16);
        let mut rng = StdRng::seed_from_u64(7);

        let board = generate(&items, &mut rng).unwrap();
        let ids = board.iter().map(|entry| entry.item_id).collect::<HashSet<_>>();
        assert_eq!(ids.len(), BOARD_CELLS);

        let catalog_ids = items.iter().map(|item| item.id).collect::<HashSet<_>>();
        assert!(ids.is_subset(&catalog_ids));
    }

    #[test]
    fn undersized_catalog_is_rejected() {
        let items = catalog(15);
        let mut rng = StdRng::seed_from_u64(7);

        let err = generate(&items, &mut rng).unwrap_err();
        assert_eq!(err, InsufficientCatalog { available: 15 });
    }

    #[test]
    fn rerolling_produces_a_different_assignment() {
        let items = catalog(40);
        let mut rng = StdRng::seed_from_u64(7);

        let first = generate(&items, &mut rng).unwrap();
        let second = generate(&items, &mut rng).unwrap();
        assert_ne!(first, second);
    }
}
