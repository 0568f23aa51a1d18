//! Ranked summaries and aggregate statistics across all players.

use futures::future::join_all;

use crate::{
    dao::models::BingoGameEntity,
    dto::leaderboard::{LeaderboardEntry, LeaderboardResponse, StatsResponse},
    error::ServiceError,
    game::patterns::BOARD_CELLS,
    services::profile_service::placeholder_display_name,
    state::SharedState,
};

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 100;

/// Build the ranked leaderboard, enriched best-effort with display profiles.
pub async fn leaderboard(
    state: &SharedState,
    limit: Option<usize>,
) -> Result<LeaderboardResponse, ServiceError> {
    let store = state.require_game_store().await?;
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let ranked = rank_games(store.list_games().await?);
    let lookup = state.profile_lookup().await;

    let entries = join_all(ranked.into_iter().take(limit).enumerate().map(
        |(index, game)| {
            let lookup = lookup.clone();
            async move {
                let profile = lookup.find_profile(&game.user_id).await;
                let (display_name, avatar_url) = match profile {
                    Some(profile) => (profile.display_name, profile.avatar_url),
                    // Lookup failures degrade to placeholder display fields
                    // rather than failing the whole call.
                    None => (placeholder_display_name(&game.user_id), None),
                };

                LeaderboardEntry {
                    rank: index + 1,
                    user_id: game.user_id,
                    display_name,
                    avatar_url,
                    total_points: game.total_points,
                    bingo_count: game.bingos_achieved.len(),
                    completed_count: game.completed_items.len(),
                    is_completed: game.is_completed,
                }
            }
        },
    ))
    .await;

    Ok(LeaderboardResponse { entries })
}

/// Aggregate statistics over every game record.
pub async fn stats(state: &SharedState) -> Result<StatsResponse, ServiceError> {
    let store = state.require_game_store().await?;
    Ok(compute_stats(&store.list_games().await?))
}

/// Sort games by the ranking key: points, then bingo count, then completed
/// count (all descending), then last update ascending so earlier finishers
/// rank above later ties.
pub fn rank_games(mut games: Vec<BingoGameEntity>) -> Vec<BingoGameEntity> {
    games.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| b.bingos_achieved.len().cmp(&a.bingos_achieved.len()))
            .then_with(|| b.completed_items.len().cmp(&a.completed_items.len()))
            .then_with(|| a.updated_at.cmp(&b.updated_at))
    });
    games
}

fn compute_stats(games: &[BingoGameEntity]) -> StatsResponse {
    let total_games = games.len() as u64;
    let completed_games = games.iter().filter(|game| game.is_completed).count() as u64;
    let total_bingos = games
        .iter()
        .map(|game| game.bingos_achieved.len() as u64)
        .sum();
    let average_completion_rate = if games.is_empty() {
        0.0
    } else {
        games
            .iter()
            .map(|game| game.completed_items.len() as f64 / BOARD_CELLS as f64)
            .sum::<f64>()
            / games.len() as f64
    };

    StatsResponse {
        total_games,
        completed_games,
        total_bingos,
        average_completion_rate,
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::*;
    use crate::dao::models::{BingoPatternEntity, CompletedItemEntity, PatternKind};
    use crate::game::engine::{POINTS_PER_BINGO, POINTS_PER_ITEM};
    use uuid::Uuid;

    fn game(
        user_id: &str,
        completed: usize,
        bingos: usize,
        updated_offset_secs: u64,
    ) -> BingoGameEntity {
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(updated_offset_secs);
        let completed_items = (0..completed)
            .map(|index| CompletedItemEntity {
                item_id: Uuid::from_u128(index as u128),
                position: index as u8,
                completed_at: now,
            })
            .collect::<Vec<_>>();
        let bingos_achieved = (0..bingos)
            .map(|index| BingoPatternEntity {
                kind: PatternKind::Row,
                positions: [
                    (4 * index) as u8,
                    (4 * index + 1) as u8,
                    (4 * index + 2) as u8,
                    (4 * index + 3) as u8,
                ],
                achieved_at: now,
                points_awarded: POINTS_PER_BINGO,
            })
            .collect::<Vec<_>>();

        BingoGameEntity {
            user_id: user_id.into(),
            board: Vec::new(),
            total_points: POINTS_PER_ITEM * completed as i64 + POINTS_PER_BINGO * bingos as i64,
            is_completed: bingos > 0,
            completed_items,
            bingos_achieved,
            game_started_at: SystemTime::UNIX_EPOCH,
            game_completed_at: None,
            created_at: SystemTime::UNIX_EPOCH,
            updated_at: now,
        }
    }

    #[test]
    fn higher_points_rank_first() {
        let ranked = rank_games(vec![game("low", 2, 0, 0), game("high", 8, 1, 0)]);
        assert_eq!(ranked[0].user_id, "high");
    }

    #[test]
    fn equal_points_break_on_bingo_count() {
        // 400 points each: 20 completions vs 0 bingos against 2 bingos.
        let two_bingos = game("two-bingos", 0, 2, 0);
        let grinder = game("grinder", 40, 0, 0);
        assert_eq!(two_bingos.total_points, grinder.total_points);

        let ranked = rank_games(vec![grinder, two_bingos]);
        assert_eq!(ranked[0].user_id, "two-bingos");
    }

    #[test]
    fn full_tie_breaks_on_earlier_update() {
        let early = game("early", 4, 1, 100);
        let late = game("late", 4, 1, 200);

        let ranked = rank_games(vec![late, early]);
        assert_eq!(ranked[0].user_id, "early");
    }

    #[test]
    fn stats_average_the_completion_rate() {
        let stats = compute_stats(&[game("a", 8, 0, 0), game("b", 4, 1, 0)]);

        assert_eq!(stats.total_games, 2);
        assert_eq!(stats.completed_games, 1);
        assert_eq!(stats.total_bingos, 1);
        let expected = (8.0 / 16.0 + 4.0 / 16.0) / 2.0;
        assert!((stats.average_completion_rate - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn stats_on_an_empty_event_are_zeroed() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.total_games, 0);
        assert_eq!(stats.average_completion_rate, 0.0);
    }
}
