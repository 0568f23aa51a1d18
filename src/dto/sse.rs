use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::game::{BingoPatternSummary, CompletedItemSummary, GameSummary};

#[derive(Clone, Debug)]
/// Dispatched payload carried across the SSE channel.
pub struct ServerEvent {
    /// SSE event name, when the payload is a named event.
    pub event: Option<String>,
    /// Serialized data field.
    pub data: String,
}

impl ServerEvent {
    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Initial metadata sent to an SSE client when it connects.
pub struct Handshake {
    /// Human-readable message confirming the subscription.
    pub message: String,
    /// Whether the backend is running without a storage backend connection.
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the backend enters or leaves degraded mode.
pub struct SystemStatus {
    /// Current degraded flag.
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a player completes a board cell.
pub struct ItemCompletedEvent {
    /// Acting player.
    pub user_id: String,
    /// The completion that was recorded.
    pub completed_item: CompletedItemSummary,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a player achieves a winning pattern.
pub struct BingoAchievedEvent {
    /// Acting player.
    pub user_id: String,
    /// The pattern that was credited.
    pub pattern: BingoPatternSummary,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast after every mutating game operation, carrying the new record.
pub struct GameUpdatedEvent {
    /// Acting player.
    pub user_id: String,
    /// The record after the mutation.
    pub game: GameSummary,
}
