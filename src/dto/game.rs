use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dao::models::{
        BingoGameEntity, BingoPatternEntity, BoardEntryEntity, CompletedItemEntity, PatternKind,
    },
    dto::{catalog::ItemSummary, format_system_time},
};

/// One cell of a board, as persisted on the game record.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BoardEntrySummary {
    /// Catalog item occupying the cell.
    pub item_id: Uuid,
    /// Cell position in `0..16`, row-major on the 4x4 grid.
    pub position: u8,
}

/// A completed cell.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompletedItemSummary {
    /// Item that was completed.
    pub item_id: Uuid,
    /// Board position the item occupied when completed.
    pub position: u8,
    /// Moment the completion was recorded (RFC 3339).
    pub completed_at: String,
}

/// An achieved winning pattern.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BingoPatternSummary {
    /// Row, column, or diagonal.
    pub kind: PatternKind,
    /// The four positions forming the line.
    pub positions: Vec<u8>,
    /// Moment the pattern was first detected (RFC 3339).
    pub achieved_at: String,
    /// Points credited for the pattern.
    pub points_awarded: i64,
}

/// Public projection of a player's game record.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GameSummary {
    /// Player owning the record.
    pub user_id: String,
    /// The 16-cell board.
    pub board: Vec<BoardEntrySummary>,
    /// Completed cells.
    pub completed_items: Vec<CompletedItemSummary>,
    /// Achieved patterns.
    pub bingos_achieved: Vec<BingoPatternSummary>,
    /// Current score.
    pub total_points: i64,
    /// Whether at least one bingo has been achieved.
    pub is_completed: bool,
    /// Start of the current play-through (RFC 3339).
    pub game_started_at: String,
    /// Moment of the first bingo, if any (RFC 3339).
    pub game_completed_at: Option<String>,
}

impl From<BoardEntryEntity> for BoardEntrySummary {
    fn from(entry: BoardEntryEntity) -> Self {
        Self {
            item_id: entry.item_id,
            position: entry.position,
        }
    }
}

impl From<CompletedItemEntity> for CompletedItemSummary {
    fn from(completed: CompletedItemEntity) -> Self {
        Self {
            item_id: completed.item_id,
            position: completed.position,
            completed_at: format_system_time(completed.completed_at),
        }
    }
}

impl From<BingoPatternEntity> for BingoPatternSummary {
    fn from(pattern: BingoPatternEntity) -> Self {
        Self {
            kind: pattern.kind,
            positions: pattern.positions.to_vec(),
            achieved_at: format_system_time(pattern.achieved_at),
            points_awarded: pattern.points_awarded,
        }
    }
}

impl From<BingoGameEntity> for GameSummary {
    fn from(game: BingoGameEntity) -> Self {
        Self {
            user_id: game.user_id,
            board: game.board.into_iter().map(Into::into).collect(),
            completed_items: game.completed_items.into_iter().map(Into::into).collect(),
            bingos_achieved: game.bingos_achieved.into_iter().map(Into::into).collect(),
            total_points: game.total_points,
            is_completed: game.is_completed,
            game_started_at: format_system_time(game.game_started_at),
            game_completed_at: game.game_completed_at.map(format_system_time),
        }
    }
}

/// One cell of the board enriched with its catalog item and completion flag,
/// in position order. What the frontend renders.
#[derive(Debug, Serialize, ToSchema)]
pub struct BoardCellView {
    /// Cell position in `0..16`.
    pub position: u8,
    /// The catalog item assigned to the cell.
    pub item: ItemSummary,
    /// Whether the caller has completed this cell.
    pub completed: bool,
}

/// Game record plus the resolved board cells.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameView {
    /// The raw game record.
    pub game: GameSummary,
    /// Board cells enriched with item details, in position order.
    pub cells: Vec<BoardCellView>,
}

/// Response of the easy auto-completion endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct EasyCompleteResponse {
    /// The record after the completion.
    pub game: GameSummary,
    /// The completion that was recorded.
    pub completed_item: CompletedItemSummary,
}

/// Up to three easy, still-unplayed items on the caller's board.
#[derive(Debug, Serialize, ToSchema)]
pub struct EasyItemsResponse {
    /// Qualifying items, cheapest first.
    pub items: Vec<ItemSummary>,
}
