use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum length accepted for a catalog item's text.
pub const ITEM_TEXT_MAX_LEN: usize = 200;

/// Sustainability category a catalog item belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemCategory {
    /// Mobility actions (cycling, public transport, car-free trips).
    Transport,
    /// Energy-saving actions (switching off, unplugging, efficiency).
    Energy,
    /// Waste-reduction actions (recycling, composting, refill habits).
    Waste,
    /// Water-saving actions.
    Water,
    /// Food-related actions (plant-based meals, local produce).
    Food,
    /// Community actions (clean-ups, sharing, volunteering).
    Community,
    /// Digital hygiene actions (mail cleanup, streaming quality, e-waste).
    Digital,
    /// Anything that does not fit the other categories.
    General,
}

/// Catalog item available for board generation, stored in persistence and
/// shared across layers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BingoItemEntity {
    /// Stable identifier for the item.
    pub id: Uuid,
    /// Action text shown on the board cell (at most [`ITEM_TEXT_MAX_LEN`] chars).
    pub text: String,
    /// Category used for filtering and the easy-item policy.
    pub category: ItemCategory,
    /// Display point value; also drives easy-item selection (lowest first).
    pub points: i64,
    /// Soft-deactivation flag; inactive items are excluded from new boards.
    pub is_active: bool,
    /// Identity of the admin (or `system`) that created the item.
    pub created_by: String,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
    /// Last time the item was updated.
    pub updated_at: SystemTime,
}

/// Assignment of one catalog item to one board cell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardEntryEntity {
    /// Catalog item occupying the cell.
    pub item_id: Uuid,
    /// Cell position in `0..16`, row-major on the 4x4 grid.
    pub position: u8,
}

/// Record of a completed board cell.
///
/// The position is copied from the board entry at completion time and is
/// never recomputed afterward, so it stays valid even if the item is later
/// reused on other boards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletedItemEntity {
    /// Item that was completed.
    pub item_id: Uuid,
    /// Board position the item occupied when completed.
    pub position: u8,
    /// Moment the completion was recorded.
    pub completed_at: SystemTime,
}

/// Shape of a winning line on the board.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternKind {
    /// Four cells of one row.
    Row,
    /// Four cells of one column.
    Column,
    /// One of the two four-cell diagonals.
    Diagonal,
}

/// An achieved winning pattern and the points it awarded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BingoPatternEntity {
    /// Row, column, or diagonal.
    pub kind: PatternKind,
    /// The four distinct positions forming the line.
    pub positions: [u8; 4],
    /// Moment the pattern was first detected.
    pub achieved_at: SystemTime,
    /// Points credited for the pattern, fixed at award time.
    pub points_awarded: i64,
}

impl BingoPatternEntity {
    /// Order-independent representation of the pattern's positions, used to
    /// detect duplicate credit.
    pub fn normalized_positions(&self) -> [u8; 4] {
        let mut sorted = self.positions;
        sorted.sort_unstable();
        sorted
    }
}

/// Aggregate per-player game record persisted by the storage layer.
///
/// Keyed uniquely by `user_id`. All mutation goes through the pure functions
/// in [`crate::game::engine`]; the stored struct itself carries no behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BingoGameEntity {
    /// External identity of the player owning the record.
    pub user_id: String,
    /// The 16-cell board, covering positions `0..16` exactly once.
    pub board: Vec<BoardEntryEntity>,
    /// Completed cells, unique by item id.
    pub completed_items: Vec<CompletedItemEntity>,
    /// Achieved patterns, unique by normalized position-set.
    pub bingos_achieved: Vec<BingoPatternEntity>,
    /// Current score, always recomputed from the two sets above.
    pub total_points: i64,
    /// True exactly while `bingos_achieved` is non-empty.
    pub is_completed: bool,
    /// Start of the current play-through (reset restarts it).
    pub game_started_at: SystemTime,
    /// Set once, when the first bingo was achieved.
    pub game_completed_at: Option<SystemTime>,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
    /// Last time the game record was updated.
    pub updated_at: SystemTime,
}
