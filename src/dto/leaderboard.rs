use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Query parameters of the leaderboard endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LeaderboardQuery {
    /// Maximum number of entries to return (clamped to `1..=100`, default 10).
    #[serde(default)]
    pub limit: Option<usize>,
}

/// One ranked leaderboard row.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    /// 1-based position after sorting; gapless even on exact ties.
    pub rank: usize,
    /// Player the row belongs to.
    pub user_id: String,
    /// Display name from the external profile lookup, or a placeholder when
    /// the lookup failed.
    pub display_name: String,
    /// Avatar from the external profile lookup, when available.
    pub avatar_url: Option<String>,
    /// Current score.
    pub total_points: i64,
    /// Number of achieved patterns.
    pub bingo_count: usize,
    /// Number of completed cells.
    pub completed_count: usize,
    /// Whether the player has at least one bingo.
    pub is_completed: bool,
}

/// Ranked leaderboard response.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardResponse {
    /// Rows in rank order.
    pub entries: Vec<LeaderboardEntry>,
}

/// Aggregate statistics across all games.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    /// Number of game records.
    pub total_games: u64,
    /// Number of games with at least one bingo.
    pub completed_games: u64,
    /// Total achieved patterns across all games.
    pub total_bingos: u64,
    /// Mean over all games of `completed cells / 16`, in `0.0..=1.0`.
    pub average_completion_rate: f64,
}
