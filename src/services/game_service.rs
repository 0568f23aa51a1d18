//! Transactional shell around the pure game engine.
//!
//! Each public operation is a single read-modify-write against one player's
//! record, serialized by that player's lock from
//! [`AppState::user_lock`](crate::state::AppState::user_lock). Events are
//! published fire-and-forget after the record is persisted, so the live
//! stream never reports state that did not reach the store.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::SystemTime;

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{
        game_store::GameStore,
        models::{BingoGameEntity, BingoItemEntity},
    },
    dto::{
        catalog::BoardsRefreshResponse,
        game::{BoardCellView, EasyCompleteResponse, EasyItemsResponse, GameSummary, GameView},
    },
    error::ServiceError,
    game::{board, engine, patterns::BOARD_CELLS},
    services::sse_events,
    state::SharedState,
};

/// Maximum number of items returned by the easy-item preview.
const EASY_PREVIEW_LIMIT: usize = 3;

/// Fetch the caller's game, creating a fresh one from the active catalog on
/// first contact.
pub async fn get_or_create_game(
    state: &SharedState,
    user_id: &str,
) -> Result<GameView, ServiceError> {
    let store = state.require_game_store().await?;

    let lock = state.user_lock(user_id);
    let _guard = lock.lock().await;

    let game = load_or_create(&store, user_id).await?;
    build_game_view(&store, game).await
}

/// Toggle a board cell for the caller.
///
/// Completion appends the cell, re-runs pattern detection, and credits new
/// bingos; un-completion removes the cell but never retracts credited
/// bingos. Fails with `ItemNotFound` when the id is unknown to the catalog
/// and `ItemNotOnBoard` when it is not among the caller's board entries.
pub async fn toggle_item(
    state: &SharedState,
    user_id: &str,
    item_id: Uuid,
) -> Result<GameSummary, ServiceError> {
    let store = state.require_game_store().await?;

    if store.find_item(item_id).await?.is_none() {
        return Err(ServiceError::ItemNotFound(item_id));
    }

    let lock = state.user_lock(user_id);
    let _guard = lock.lock().await;

    let game = load_or_create(&store, user_id).await?;
    let outcome = engine::toggle_item(&game, item_id, SystemTime::now())?;
    store.save_game(outcome.game.clone()).await?;

    sse_events::broadcast_changes(state, user_id, &outcome.changes);
    sse_events::broadcast_game_updated(state, user_id, &outcome.game);

    Ok(outcome.game.into())
}

/// Auto-complete the cheapest easy item on the caller's board.
pub async fn complete_easy_item(
    state: &SharedState,
    user_id: &str,
) -> Result<EasyCompleteResponse, ServiceError> {
    let store = state.require_game_store().await?;

    let lock = state.user_lock(user_id);
    let _guard = lock.lock().await;

    let game = load_or_create(&store, user_id).await?;
    let board_items = resolve_board_items(&store, &game).await?;
    let outcome = engine::complete_easy_item(
        &game,
        &board_items,
        state.config().easy_policy(),
        SystemTime::now(),
    )?;

    let completed_item = outcome
        .completed_item()
        .cloned()
        .ok_or_else(|| ServiceError::Internal("easy completion produced no completion".into()))?;

    store.save_game(outcome.game.clone()).await?;

    sse_events::broadcast_changes(state, user_id, &outcome.changes);
    sse_events::broadcast_game_updated(state, user_id, &outcome.game);

    Ok(EasyCompleteResponse {
        game: outcome.game.into(),
        completed_item: completed_item.into(),
    })
}

/// Up to three easy, still-unplayed items on the caller's board, cheapest
/// first.
pub async fn easy_items(
    state: &SharedState,
    user_id: &str,
) -> Result<EasyItemsResponse, ServiceError> {
    let store = state.require_game_store().await?;

    let lock = state.user_lock(user_id);
    let _guard = lock.lock().await;

    let game = load_or_create(&store, user_id).await?;
    let board_items = resolve_board_items(&store, &game).await?;
    let items = engine::easy_candidates(&game, &board_items, state.config().easy_policy())
        .into_iter()
        .take(EASY_PREVIEW_LIMIT)
        .cloned()
        .map(Into::into)
        .collect();

    Ok(EasyItemsResponse { items })
}

/// Clear the caller's completion state, preserving the board.
pub async fn reset_game(state: &SharedState, user_id: &str) -> Result<GameSummary, ServiceError> {
    let store = state.require_game_store().await?;

    let lock = state.user_lock(user_id);
    let _guard = lock.lock().await;

    let Some(game) = store.find_game(user_id).await? else {
        return Err(ServiceError::GameNotFound(user_id.to_owned()));
    };

    let next = engine::reset_game(&game, SystemTime::now());
    store.save_game(next.clone()).await?;

    sse_events::broadcast_game_updated(state, user_id, &next);

    info!(user_id, "game reset");
    Ok(next.into())
}

/// Regenerate every player's board from the current active catalog.
///
/// Each player's step runs behind that player's lock, so an in-flight toggle
/// either completes before the refresh or observes the fresh board. The
/// refresh is a brand-new game state: completions against the old board are
/// discarded, not merged.
pub async fn refresh_all_boards(
    state: &SharedState,
) -> Result<BoardsRefreshResponse, ServiceError> {
    let store = state.require_game_store().await?;

    let active = store.list_items(true).await?;
    if active.len() < BOARD_CELLS {
        // Fail before touching any board rather than stranding a subset.
        return Err(ServiceError::InsufficientCatalog {
            available: active.len(),
        });
    }

    let games = store.list_games().await?;
    let mut boards_refreshed = 0;

    for stale in games {
        let lock = state.user_lock(&stale.user_id);
        let _guard = lock.lock().await;

        // Reload under the lock so a toggle that won the race is the state
        // being replaced, not silently resurrected.
        let Some(current) = store.find_game(&stale.user_id).await? else {
            continue;
        };

        let board = board::generate(&active, &mut rand::rng())?;
        let next = engine::refreshed_game(&current, board, SystemTime::now());
        store.save_game(next.clone()).await?;

        sse_events::broadcast_game_updated(state, &next.user_id, &next);
        boards_refreshed += 1;
    }

    info!(boards_refreshed, "refreshed all player boards");
    Ok(BoardsRefreshResponse { boards_refreshed })
}

async fn load_or_create(
    store: &Arc<dyn GameStore>,
    user_id: &str,
) -> Result<BingoGameEntity, ServiceError> {
    if let Some(game) = store.find_game(user_id).await? {
        return Ok(game);
    }

    let active = store.list_items(true).await?;
    let board = board::generate(&active, &mut rand::rng())?;
    let game = engine::new_game(user_id.to_owned(), board, SystemTime::now());
    store.save_game(game.clone()).await?;

    info!(user_id, "created fresh bingo game");
    Ok(game)
}

/// Resolve the catalog entries referenced by a game's board.
async fn resolve_board_items(
    store: &Arc<dyn GameStore>,
    game: &BingoGameEntity,
) -> Result<Vec<BingoItemEntity>, ServiceError> {
    let wanted = game
        .board
        .iter()
        .map(|entry| entry.item_id)
        .collect::<HashSet<_>>();

    Ok(store
        .list_items(false)
        .await?
        .into_iter()
        .filter(|item| wanted.contains(&item.id))
        .collect())
}

async fn build_game_view(
    store: &Arc<dyn GameStore>,
    game: BingoGameEntity,
) -> Result<GameView, ServiceError> {
    let board_items = resolve_board_items(store, &game).await?;
    let by_id = board_items
        .into_iter()
        .map(|item| (item.id, item))
        .collect::<HashMap<_, _>>();
    let completed = game
        .completed_items
        .iter()
        .map(|completed| completed.item_id)
        .collect::<HashSet<_>>();

    let mut cells = Vec::with_capacity(game.board.len());
    for entry in &game.board {
        let Some(item) = by_id.get(&entry.item_id) else {
            // Items are soft-deactivated, never deleted, so this indicates a
            // corrupted record.
            return Err(ServiceError::Internal(format!(
                "board references unknown item `{}`",
                entry.item_id
            )));
        };
        cells.push(BoardCellView {
            position: entry.position,
            item: item.clone().into(),
            completed: completed.contains(&entry.item_id),
        });
    }
    cells.sort_by_key(|cell| cell.position);

    Ok(GameView {
        game: game.into(),
        cells,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::time::SystemTime;

    use tokio::sync::broadcast::error::TryRecvError;
    use uuid::Uuid;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{game_store::memory::MemoryGameStore, models::ItemCategory},
        dto::sse::ServerEvent,
    };

    async fn seeded_state() -> (SharedState, MemoryGameStore) {
        let state = crate::state::AppState::new(AppConfig::default());
        let store = MemoryGameStore::new();

        for index in 0..20u8 {
            let item = BingoItemEntity {
                id: Uuid::from_u128(0x4000 + index as u128),
                text: format!("action {index}"),
                category: if index % 2 == 0 {
                    ItemCategory::Energy
                } else {
                    ItemCategory::Food
                },
                points: 5 + index as i64,
                is_active: true,
                created_by: "system".into(),
                created_at: SystemTime::UNIX_EPOCH,
                updated_at: SystemTime::UNIX_EPOCH,
            };
            store.save_item(item).await.unwrap();
        }

        state
            .install_game_store(std::sync::Arc::new(store.clone()))
            .await;
        (state, store)
    }

    fn event_names(
        receiver: &mut tokio::sync::broadcast::Receiver<ServerEvent>,
    ) -> Vec<String> {
        let mut names = Vec::new();
        loop {
            match receiver.try_recv() {
                Ok(event) => names.push(event.event.unwrap_or_default()),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                Err(TryRecvError::Lagged(_)) => continue,
            }
        }
        names
    }

    async fn row_item_ids(store: &MemoryGameStore, user_id: &str) -> Vec<Uuid> {
        let game = store.find_game(user_id).await.unwrap().unwrap();
        let mut board = game.board.clone();
        board.sort_by_key(|entry| entry.position);
        board[..4].iter().map(|entry| entry.item_id).collect()
    }

    #[tokio::test]
    async fn first_contact_creates_a_full_board() {
        let (state, _store) = seeded_state().await;

        let view = get_or_create_game(&state, "alice").await.unwrap();
        assert_eq!(view.cells.len(), 16);
        assert_eq!(view.game.total_points, 0);

        let positions = view
            .cells
            .iter()
            .map(|cell| cell.position)
            .collect::<HashSet<_>>();
        assert_eq!(positions, (0u8..16).collect::<HashSet<_>>());
    }

    #[tokio::test]
    async fn second_fetch_returns_the_same_board() {
        let (state, _store) = seeded_state().await;

        let first = get_or_create_game(&state, "alice").await.unwrap();
        let second = get_or_create_game(&state, "alice").await.unwrap();
        assert_eq!(first.game.board.len(), second.game.board.len());
        for (a, b) in first.game.board.iter().zip(second.game.board.iter()) {
            assert_eq!(a.item_id, b.item_id);
            assert_eq!(a.position, b.position);
        }
    }

    #[tokio::test]
    async fn toggling_an_unknown_item_fails_before_any_mutation() {
        let (state, store) = seeded_state().await;

        let err = toggle_item(&state, "alice", Uuid::from_u128(0xdead))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ItemNotFound(_)));
        assert!(store.find_game("alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn toggling_an_off_board_item_is_a_conflict() {
        let (state, store) = seeded_state().await;

        get_or_create_game(&state, "alice").await.unwrap();
        let game = store.find_game("alice").await.unwrap().unwrap();
        let on_board = game
            .board
            .iter()
            .map(|entry| entry.item_id)
            .collect::<HashSet<_>>();
        let off_board = (0..20u8)
            .map(|index| Uuid::from_u128(0x4000 + index as u128))
            .find(|id| !on_board.contains(id))
            .expect("catalog is larger than the board");

        let err = toggle_item(&state, "alice", off_board).await.unwrap_err();
        assert!(matches!(err, ServiceError::ItemNotOnBoard(_)));
    }

    #[tokio::test]
    async fn completing_a_row_emits_the_contractual_event_order() {
        let (state, store) = seeded_state().await;
        get_or_create_game(&state, "alice").await.unwrap();

        let row = row_item_ids(&store, "alice").await;
        for item_id in &row[..3] {
            toggle_item(&state, "alice", *item_id).await.unwrap();
        }

        let mut receiver = state.game_sse().subscribe();
        toggle_item(&state, "alice", row[3]).await.unwrap();

        assert_eq!(
            event_names(&mut receiver),
            vec!["item.completed", "bingo.achieved", "game.updated"]
        );

        let game = store.find_game("alice").await.unwrap().unwrap();
        assert!(game.is_completed);
        assert_eq!(game.total_points, 4 * 10 + 200);
    }

    #[tokio::test]
    async fn toggling_off_emits_only_the_game_update() {
        let (state, store) = seeded_state().await;
        get_or_create_game(&state, "alice").await.unwrap();

        let row = row_item_ids(&store, "alice").await;
        toggle_item(&state, "alice", row[0]).await.unwrap();

        let mut receiver = state.game_sse().subscribe();
        let summary = toggle_item(&state, "alice", row[0]).await.unwrap();

        assert_eq!(event_names(&mut receiver), vec!["game.updated"]);
        assert!(summary.completed_items.is_empty());
    }

    #[tokio::test]
    async fn easy_completion_completes_the_cheapest_energy_item() {
        let (state, store) = seeded_state().await;
        get_or_create_game(&state, "alice").await.unwrap();

        let response = complete_easy_item(&state, "alice").await.unwrap();
        let completed_id = response.completed_item.item_id;

        let completed = store
            .find_item(completed_id)
            .await
            .unwrap()
            .expect("completed item exists");
        assert_eq!(completed.category, ItemCategory::Energy);

        // Cheapest qualifying board item wins.
        let game = store.find_game("alice").await.unwrap().unwrap();
        let board_items = resolve_board_items(
            &state.game_store().await.unwrap(),
            &game,
        )
        .await
        .unwrap();
        let cheapest_energy = board_items
            .iter()
            .filter(|item| item.category == ItemCategory::Energy)
            .map(|item| item.points)
            .min()
            .unwrap();
        assert_eq!(completed.points, cheapest_energy);
    }

    #[tokio::test]
    async fn easy_preview_returns_at_most_three_cheapest_first() {
        let (state, _store) = seeded_state().await;

        let response = easy_items(&state, "alice").await.unwrap();
        assert!(response.items.len() <= 3);
        assert!(!response.items.is_empty());
        assert!(
            response
                .items
                .windows(2)
                .all(|pair| pair[0].points <= pair[1].points)
        );
    }

    #[tokio::test]
    async fn reset_requires_an_existing_game() {
        let (state, _store) = seeded_state().await;

        let err = reset_game(&state, "nobody").await.unwrap_err();
        assert!(matches!(err, ServiceError::GameNotFound(_)));
    }

    #[tokio::test]
    async fn reset_clears_progress_but_keeps_the_board() {
        let (state, store) = seeded_state().await;
        get_or_create_game(&state, "alice").await.unwrap();

        let row = row_item_ids(&store, "alice").await;
        for item_id in &row {
            toggle_item(&state, "alice", *item_id).await.unwrap();
        }

        let before = store.find_game("alice").await.unwrap().unwrap();
        let summary = reset_game(&state, "alice").await.unwrap();

        assert!(summary.completed_items.is_empty());
        assert!(summary.bingos_achieved.is_empty());
        assert_eq!(summary.total_points, 0);

        let after = store.find_game("alice").await.unwrap().unwrap();
        assert_eq!(after.board, before.board);
    }

    #[tokio::test]
    async fn board_refresh_discards_stale_completions() {
        let (state, store) = seeded_state().await;
        get_or_create_game(&state, "alice").await.unwrap();
        get_or_create_game(&state, "bob").await.unwrap();

        let row = row_item_ids(&store, "alice").await;
        toggle_item(&state, "alice", row[0]).await.unwrap();

        let response = refresh_all_boards(&state).await.unwrap();
        assert_eq!(response.boards_refreshed, 2);

        let alice = store.find_game("alice").await.unwrap().unwrap();
        assert!(alice.completed_items.is_empty());
        assert_eq!(alice.total_points, 0);
        assert_eq!(alice.board.len(), 16);
    }
}
