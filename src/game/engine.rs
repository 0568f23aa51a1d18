//! Pure game mutations.
//!
//! Every operation takes an immutable snapshot of a player's record and
//! returns a new record plus the ordered list of change events the caller
//! must publish after persisting. Nothing here touches storage or the event
//! hub, which keeps the whole state machine deterministic under test.

use std::collections::HashSet;
use std::time::SystemTime;

use thiserror::Error;
use uuid::Uuid;

use crate::config::EasyItemPolicy;
use crate::dao::models::{
    BingoGameEntity, BingoItemEntity, BingoPatternEntity, BoardEntryEntity, CompletedItemEntity,
};
use crate::game::patterns;

/// Points credited for each completed cell.
pub const POINTS_PER_ITEM: i64 = 10;
/// Points credited for each achieved pattern, regardless of its items.
pub const POINTS_PER_BINGO: i64 = 200;

/// Change produced by a mutation, in the exact order events must be
/// published: completion first, then each new pattern in detector order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameChange {
    /// A cell was completed.
    ItemCompleted(CompletedItemEntity),
    /// A winning pattern was credited.
    BingoAchieved(BingoPatternEntity),
}

/// New record plus the ordered changes a mutation produced.
///
/// The `game.updated` notification is not part of `changes`: it is emitted
/// unconditionally, exactly once per mutating call, by the service shell.
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    /// The record after the mutation.
    pub game: BingoGameEntity,
    /// Ordered changes to publish.
    pub changes: Vec<GameChange>,
}

impl MutationOutcome {
    /// The completion recorded by this mutation, when it took the
    /// completion branch.
    pub fn completed_item(&self) -> Option<&CompletedItemEntity> {
        self.changes.iter().find_map(|change| match change {
            GameChange::ItemCompleted(completed) => Some(completed),
            GameChange::BingoAchieved(_) => None,
        })
    }
}

/// Toggle failure: the item exists but is not on this player's board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("item `{0}` is not on this board")]
pub struct ItemNotOnBoard(pub Uuid);

/// Failures of the easy-item auto-completion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EasyCompleteError {
    /// The game already has a bingo; auto-completion is disabled.
    #[error("game is already completed")]
    GameAlreadyComplete,
    /// No uncompleted board item matches the easy policy.
    #[error("no easy item left on this board")]
    NoEasyItemAvailable,
}

/// Build a fresh zero-state record around a generated board.
pub fn new_game(user_id: String, board: Vec<BoardEntryEntity>, now: SystemTime) -> BingoGameEntity {
    BingoGameEntity {
        user_id,
        board,
        completed_items: Vec::new(),
        bingos_achieved: Vec::new(),
        total_points: 0,
        is_completed: false,
        game_started_at: now,
        game_completed_at: None,
        created_at: now,
        updated_at: now,
    }
}

/// Toggle one board cell.
///
/// Completing appends a [`CompletedItemEntity`] carrying the position
/// recorded on the board, runs the pattern detector, and credits any new
/// patterns. Un-completing only removes the item: patterns already credited
/// (and their points) are permanent, so the score is recomputed from the
/// current sets rather than rolled back.
pub fn toggle_item(
    game: &BingoGameEntity,
    item_id: Uuid,
    now: SystemTime,
) -> Result<MutationOutcome, ItemNotOnBoard> {
    let Some(entry) = game.board.iter().find(|entry| entry.item_id == item_id) else {
        return Err(ItemNotOnBoard(item_id));
    };

    if let Some(index) = game
        .completed_items
        .iter()
        .position(|completed| completed.item_id == item_id)
    {
        let mut next = game.clone();
        next.completed_items.remove(index);
        recompute(&mut next, now);
        return Ok(MutationOutcome {
            game: next,
            changes: Vec::new(),
        });
    }

    Ok(complete(game.clone(), entry.position, item_id, now))
}

/// Uncompleted board items matching the easy policy, cheapest first.
///
/// `board_items` are the resolved catalog entries for the player's board;
/// anything not on the board is ignored. The sort is stable, so items with
/// equal points keep their resolution order.
pub fn easy_candidates<'a>(
    game: &BingoGameEntity,
    board_items: &'a [BingoItemEntity],
    policy: &EasyItemPolicy,
) -> Vec<&'a BingoItemEntity> {
    let on_board = game
        .board
        .iter()
        .map(|entry| entry.item_id)
        .collect::<HashSet<_>>();
    let completed = game
        .completed_items
        .iter()
        .map(|completed| completed.item_id)
        .collect::<HashSet<_>>();

    let mut candidates = board_items
        .iter()
        .filter(|item| on_board.contains(&item.id))
        .filter(|item| !completed.contains(&item.id))
        .filter(|item| policy.qualifies(item))
        .collect::<Vec<_>>();
    candidates.sort_by_key(|item| item.points);
    candidates
}

/// Auto-complete the cheapest easy item on the board.
///
/// Identical to the completion branch of [`toggle_item`] once the item is
/// selected.
pub fn complete_easy_item(
    game: &BingoGameEntity,
    board_items: &[BingoItemEntity],
    policy: &EasyItemPolicy,
    now: SystemTime,
) -> Result<MutationOutcome, EasyCompleteError> {
    if game.is_completed {
        return Err(EasyCompleteError::GameAlreadyComplete);
    }

    let candidates = easy_candidates(game, board_items, policy);
    let Some(item) = candidates.first() else {
        return Err(EasyCompleteError::NoEasyItemAvailable);
    };

    let position = game
        .board
        .iter()
        .find(|entry| entry.item_id == item.id)
        .map(|entry| entry.position)
        .unwrap_or_default();

    Ok(complete(game.clone(), position, item.id, now))
}

/// Clear all completion state while preserving the board, restarting the
/// play-through clock.
pub fn reset_game(game: &BingoGameEntity, now: SystemTime) -> BingoGameEntity {
    let mut next = game.clone();
    next.completed_items.clear();
    next.bingos_achieved.clear();
    next.total_points = 0;
    next.is_completed = false;
    next.game_started_at = now;
    next.game_completed_at = None;
    next.updated_at = now;
    next
}

/// Replace the board with a freshly generated one and start over.
///
/// A refresh is a brand-new game state: completions recorded against the
/// old board are discarded, never merged.
pub fn refreshed_game(
    game: &BingoGameEntity,
    board: Vec<BoardEntryEntity>,
    now: SystemTime,
) -> BingoGameEntity {
    let mut next = reset_game(game, now);
    next.board = board;
    next
}

fn complete(
    mut game: BingoGameEntity,
    position: u8,
    item_id: Uuid,
    now: SystemTime,
) -> MutationOutcome {
    let completed = CompletedItemEntity {
        item_id,
        position,
        completed_at: now,
    };
    game.completed_items.push(completed.clone());
    let mut changes = vec![GameChange::ItemCompleted(completed)];

    let completed_positions = game
        .completed_items
        .iter()
        .map(|completed| completed.position)
        .collect::<HashSet<_>>();
    let already_achieved = game
        .bingos_achieved
        .iter()
        .map(BingoPatternEntity::normalized_positions)
        .collect::<HashSet<_>>();

    for (kind, positions) in patterns::detect(&completed_positions, &already_achieved) {
        let pattern = BingoPatternEntity {
            kind,
            positions,
            achieved_at: now,
            points_awarded: POINTS_PER_BINGO,
        };
        game.bingos_achieved.push(pattern.clone());
        changes.push(GameChange::BingoAchieved(pattern));
    }

    recompute(&mut game, now);
    MutationOutcome { game, changes }
}

/// Derive score and completion flags from the current sets.
fn recompute(game: &mut BingoGameEntity, now: SystemTime) {
    game.total_points = POINTS_PER_ITEM * game.completed_items.len() as i64
        + game
            .bingos_achieved
            .iter()
            .map(|pattern| pattern.points_awarded)
            .sum::<i64>();

    let was_completed = game.is_completed;
    game.is_completed = !game.bingos_achieved.is_empty();
    if game.is_completed && !was_completed {
        game.game_completed_at = Some(now);
    }
    game.updated_at = now;
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::*;
    use crate::dao::models::{ItemCategory, PatternKind};

    fn item_id(cell: u8) -> Uuid {
        Uuid::from_u128(0x1000 + cell as u128)
    }

    fn board() -> Vec<BoardEntryEntity> {
        (0u8..16)
            .map(|position| BoardEntryEntity {
                item_id: item_id(position),
                position,
            })
            .collect()
    }

    fn game() -> BingoGameEntity {
        new_game("user-1".into(), board(), SystemTime::UNIX_EPOCH)
    }

    fn board_item(cell: u8, category: ItemCategory, points: i64, text: &str) -> BingoItemEntity {
        BingoItemEntity {
            id: item_id(cell),
            text: text.into(),
            category,
            points,
            is_active: true,
            created_by: "system".into(),
            created_at: SystemTime::UNIX_EPOCH,
            updated_at: SystemTime::UNIX_EPOCH,
        }
    }

    fn now_plus(seconds: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(seconds)
    }

    fn assert_scoring_invariant(game: &BingoGameEntity) {
        let expected = POINTS_PER_ITEM * game.completed_items.len() as i64
            + POINTS_PER_BINGO * game.bingos_achieved.len() as i64;
        assert_eq!(game.total_points, expected);
    }

    fn complete_cells(mut game: BingoGameEntity, cells: &[u8]) -> BingoGameEntity {
        for (step, &cell) in cells.iter().enumerate() {
            let outcome = toggle_item(&game, item_id(cell), now_plus(step as u64 + 1)).unwrap();
            assert_scoring_invariant(&outcome.game);
            game = outcome.game;
        }
        game
    }

    #[test]
    fn completing_records_board_position_and_points() {
        let outcome = toggle_item(&game(), item_id(6), now_plus(1)).unwrap();

        let completed = outcome.completed_item().expect("completion change");
        assert_eq!(completed.item_id, item_id(6));
        assert_eq!(completed.position, 6);
        assert_eq!(outcome.game.total_points, POINTS_PER_ITEM);
        assert!(!outcome.game.is_completed);
        assert_eq!(outcome.game.game_completed_at, None);
    }

    #[test]
    fn unknown_item_is_rejected() {
        let stranger = Uuid::from_u128(0xdead);
        let err = toggle_item(&game(), stranger, now_plus(1)).unwrap_err();
        assert_eq!(err, ItemNotOnBoard(stranger));
    }

    #[test]
    fn completing_a_row_awards_a_bingo_and_completes_the_game() {
        let game = complete_cells(game(), &[0, 1, 2, 3]);

        assert_eq!(game.bingos_achieved.len(), 1);
        let pattern = &game.bingos_achieved[0];
        assert_eq!(pattern.kind, PatternKind::Row);
        assert_eq!(pattern.positions, [0, 1, 2, 3]);
        assert_eq!(pattern.points_awarded, POINTS_PER_BINGO);
        assert_eq!(game.total_points, 4 * POINTS_PER_ITEM + POINTS_PER_BINGO);
        assert!(game.is_completed);
        assert_eq!(game.game_completed_at, Some(now_plus(4)));
    }

    #[test]
    fn change_order_is_completion_then_patterns() {
        let game = complete_cells(game(), &[0, 1, 2]);
        let outcome = toggle_item(&game, item_id(3), now_plus(10)).unwrap();

        assert_eq!(outcome.changes.len(), 2);
        assert!(matches!(outcome.changes[0], GameChange::ItemCompleted(_)));
        assert!(matches!(outcome.changes[1], GameChange::BingoAchieved(_)));
    }

    #[test]
    fn one_toggle_can_credit_several_patterns_in_detector_order() {
        // Row 0 and column 3 both lack only position 3.
        let game = complete_cells(game(), &[0, 1, 2, 7, 11, 15]);
        let outcome = toggle_item(&game, item_id(3), now_plus(10)).unwrap();

        let kinds = outcome
            .changes
            .iter()
            .filter_map(|change| match change {
                GameChange::BingoAchieved(pattern) => Some((pattern.kind, pattern.positions)),
                GameChange::ItemCompleted(_) => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                (PatternKind::Row, [0, 1, 2, 3]),
                (PatternKind::Column, [3, 7, 11, 15]),
            ]
        );
        assert_scoring_invariant(&outcome.game);
    }

    #[test]
    fn toggling_off_keeps_earned_bingos_and_their_points() {
        let game = complete_cells(game(), &[0, 1, 2, 3]);
        let outcome = toggle_item(&game, item_id(3), now_plus(10)).unwrap();

        let after = outcome.game;
        assert!(outcome.changes.is_empty());
        assert_eq!(after.completed_items.len(), 3);
        // The row credit is permanent; only the item's own points go away.
        assert_eq!(after.bingos_achieved.len(), 1);
        assert_eq!(after.total_points, 3 * POINTS_PER_ITEM + POINTS_PER_BINGO);
        assert!(after.is_completed);
        assert_eq!(after.game_completed_at, Some(now_plus(4)));
        assert_scoring_invariant(&after);
    }

    #[test]
    fn retoggling_an_achieved_line_does_not_recredit() {
        let game = complete_cells(game(), &[0, 1, 2, 3]);
        let game = toggle_item(&game, item_id(3), now_plus(10)).unwrap().game;
        let outcome = toggle_item(&game, item_id(3), now_plus(11)).unwrap();

        assert_eq!(outcome.game.bingos_achieved.len(), 1);
        assert_eq!(outcome.changes.len(), 1);
        assert!(matches!(outcome.changes[0], GameChange::ItemCompleted(_)));
        assert_scoring_invariant(&outcome.game);
    }

    #[test]
    fn toggle_round_trip_restores_membership() {
        let before = game();
        let on = toggle_item(&before, item_id(9), now_plus(1)).unwrap().game;
        let off = toggle_item(&on, item_id(9), now_plus(2)).unwrap().game;

        assert_eq!(off.completed_items, before.completed_items);
        assert_eq!(off.total_points, 0);
    }

    #[test]
    fn easy_completion_picks_the_cheapest_qualifying_item() {
        let policy = EasyItemPolicy::default();
        let items = vec![
            board_item(0, ItemCategory::Energy, 30, "install solar panels"),
            board_item(1, ItemCategory::Digital, 5, "delete old emails"),
            board_item(2, ItemCategory::Transport, 5, "cycle to the venue"),
            board_item(3, ItemCategory::Energy, 10, "unplug chargers"),
        ];

        let outcome = complete_easy_item(&game(), &items, &policy, now_plus(1)).unwrap();
        let completed = outcome.completed_item().unwrap();
        assert_eq!(completed.item_id, item_id(1));
        assert_eq!(completed.position, 1);
    }

    #[test]
    fn easy_completion_matches_keywords_case_insensitively() {
        let policy = EasyItemPolicy::default();
        // Wrong category, but the text carries an ease-signaling keyword.
        let items = vec![board_item(4, ItemCategory::Waste, 15, "RECYCLE a bottle")];

        let outcome = complete_easy_item(&game(), &items, &policy, now_plus(1)).unwrap();
        assert_eq!(outcome.completed_item().unwrap().item_id, item_id(4));
    }

    #[test]
    fn easy_completion_without_candidates_fails() {
        let policy = EasyItemPolicy::default();
        let items = vec![
            board_item(0, ItemCategory::Food, 20, "host a plant-based lunch"),
            board_item(1, ItemCategory::Water, 25, "fix a dripping tap"),
        ];

        let err = complete_easy_item(&game(), &items, &policy, now_plus(1)).unwrap_err();
        assert_eq!(err, EasyCompleteError::NoEasyItemAvailable);
    }

    #[test]
    fn easy_completion_skips_already_completed_items() {
        let policy = EasyItemPolicy::default();
        let items = vec![
            board_item(0, ItemCategory::Energy, 5, "unplug chargers"),
            board_item(1, ItemCategory::Energy, 10, "switch to stairs"),
        ];

        let game = complete_cells(game(), &[0]);
        let outcome = complete_easy_item(&game, &items, &policy, now_plus(5)).unwrap();
        assert_eq!(outcome.completed_item().unwrap().item_id, item_id(1));
    }

    #[test]
    fn easy_completion_rejected_once_the_game_is_complete() {
        let policy = EasyItemPolicy::default();
        let items = vec![board_item(4, ItemCategory::Energy, 5, "unplug chargers")];

        let game = complete_cells(game(), &[0, 1, 2, 3]);
        let err = complete_easy_item(&game, &items, &policy, now_plus(9)).unwrap_err();
        assert_eq!(err, EasyCompleteError::GameAlreadyComplete);
    }

    #[test]
    fn reset_clears_state_and_preserves_the_board() {
        let before = complete_cells(game(), &[0, 1, 2, 3, 7]);
        let after = reset_game(&before, now_plus(100));

        assert!(after.completed_items.is_empty());
        assert!(after.bingos_achieved.is_empty());
        assert_eq!(after.total_points, 0);
        assert!(!after.is_completed);
        assert_eq!(after.game_completed_at, None);
        assert_eq!(after.game_started_at, now_plus(100));
        assert_eq!(after.board, before.board);
        assert_scoring_invariant(&after);
    }

    #[test]
    fn refresh_discards_completions_and_installs_the_new_board() {
        let before = complete_cells(game(), &[0, 1, 2]);
        let new_board = (0u8..16)
            .map(|position| BoardEntryEntity {
                item_id: Uuid::from_u128(0x2000 + position as u128),
                position,
            })
            .collect::<Vec<_>>();

        let after = refreshed_game(&before, new_board.clone(), now_plus(50));
        assert_eq!(after.board, new_board);
        assert!(after.completed_items.is_empty());
        assert_eq!(after.total_points, 0);
        assert_eq!(after.user_id, before.user_id);
    }
}
