use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::{
        catalog::ItemsResponse,
        common::NoQuery,
        leaderboard::{LeaderboardQuery, LeaderboardResponse, StatsResponse},
    },
    error::AppError,
    services::{catalog_service, leaderboard_service},
    state::SharedState,
};

/// Public read-only endpoints; no authentication required.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/public/items", get(get_items))
        .route("/public/leaderboard", get(get_leaderboard))
        .route("/public/stats", get(get_stats))
}

#[utoipa::path(
    get,
    path = "/public/items",
    tag = "public",
    responses((status = 200, description = "Active catalog items", body = ItemsResponse))
)]
/// Return the catalog items currently eligible for boards.
pub async fn get_items(
    State(state): State<SharedState>,
    Query(_no_query): Query<NoQuery>,
) -> Result<Json<ItemsResponse>, AppError> {
    let payload = catalog_service::list_active_items(&state).await?;
    Ok(Json(payload))
}

#[utoipa::path(
    get,
    path = "/public/leaderboard",
    tag = "public",
    params(("limit" = Option<usize>, Query, description = "Maximum entries (1..=100, default 10)")),
    responses((status = 200, description = "Ranked players", body = LeaderboardResponse))
)]
/// Return the top players ranked by points, bingos, completions, and time.
pub async fn get_leaderboard(
    State(state): State<SharedState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let payload = leaderboard_service::leaderboard(&state, query.limit).await?;
    Ok(Json(payload))
}

#[utoipa::path(
    get,
    path = "/public/stats",
    tag = "public",
    responses((status = 200, description = "Aggregate game statistics", body = StatsResponse))
)]
/// Return aggregate statistics across all games.
pub async fn get_stats(
    State(state): State<SharedState>,
    Query(_no_query): Query<NoQuery>,
) -> Result<Json<StatsResponse>, AppError> {
    let payload = leaderboard_service::stats(&state).await?;
    Ok(Json(payload))
}
