//! Typed broadcast helpers for the live game event stream.
//!
//! For a single mutating call the publication order is part of the API
//! contract: `item.completed` (completion branch only), then one
//! `bingo.achieved` per new pattern in detector order, then exactly one
//! `game.updated`. [`broadcast_changes`] preserves the order produced by the
//! engine; the caller appends the `game.updated` notification.

use serde::Serialize;
use tracing::warn;

use crate::{
    dao::models::{BingoGameEntity, BingoPatternEntity, CompletedItemEntity},
    dto::sse::{
        BingoAchievedEvent, GameUpdatedEvent, ItemCompletedEvent, ServerEvent, SystemStatus,
    },
    game::engine::GameChange,
    state::SharedState,
};

const EVENT_ITEM_COMPLETED: &str = "item.completed";
const EVENT_BINGO_ACHIEVED: &str = "bingo.achieved";
const EVENT_GAME_UPDATED: &str = "game.updated";
const EVENT_SYSTEM_STATUS: &str = "system.status";

/// Broadcast that a player completed a board cell.
pub fn broadcast_item_completed(
    state: &SharedState,
    user_id: &str,
    completed: &CompletedItemEntity,
) {
    let payload = ItemCompletedEvent {
        user_id: user_id.to_owned(),
        completed_item: completed.clone().into(),
    };
    send_game_event(state, EVENT_ITEM_COMPLETED, &payload);
}

/// Broadcast that a player achieved a winning pattern.
pub fn broadcast_bingo_achieved(
    state: &SharedState,
    user_id: &str,
    pattern: &BingoPatternEntity,
) {
    let payload = BingoAchievedEvent {
        user_id: user_id.to_owned(),
        pattern: pattern.clone().into(),
    };
    send_game_event(state, EVENT_BINGO_ACHIEVED, &payload);
}

/// Broadcast the record state after a mutating operation.
pub fn broadcast_game_updated(state: &SharedState, user_id: &str, game: &BingoGameEntity) {
    let payload = GameUpdatedEvent {
        user_id: user_id.to_owned(),
        game: game.clone().into(),
    };
    send_game_event(state, EVENT_GAME_UPDATED, &payload);
}

/// Fan out an engine change list in order.
pub fn broadcast_changes(state: &SharedState, user_id: &str, changes: &[GameChange]) {
    for change in changes {
        match change {
            GameChange::ItemCompleted(completed) => {
                broadcast_item_completed(state, user_id, completed);
            }
            GameChange::BingoAchieved(pattern) => {
                broadcast_bingo_achieved(state, user_id, pattern);
            }
        }
    }
}

/// Broadcast that the backend entered or left degraded mode.
pub fn broadcast_system_status(state: &SharedState, degraded: bool) {
    send_game_event(state, EVENT_SYSTEM_STATUS, &SystemStatus { degraded });
}

fn send_game_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.game_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize SSE payload"),
    }
}
