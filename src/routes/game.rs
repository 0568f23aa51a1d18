use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::game::{EasyCompleteResponse, EasyItemsResponse, GameSummary, GameView},
    error::AppError,
    routes::auth::VerifiedPlayer,
    services::game_service,
    state::SharedState,
};

/// Player-facing game routes; all require a verified identity.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/game", get(get_game))
        .route("/game/easy-items", get(easy_items))
        .route("/game/items/{id}/toggle", post(toggle_item))
        .route("/game/easy-complete", post(complete_easy_item))
        .route("/game/reset", post(reset_game))
}

#[utoipa::path(
    get,
    path = "/game",
    tag = "game",
    responses(
        (status = 200, description = "The caller's game, created on first contact", body = GameView),
        (status = 403, description = "Email address not verified"),
        (status = 409, description = "Active catalog too small to generate a board")
    )
)]
/// Fetch the caller's game, lazily creating it with a fresh board.
pub async fn get_game(
    State(state): State<SharedState>,
    VerifiedPlayer(identity): VerifiedPlayer,
) -> Result<Json<GameView>, AppError> {
    let view = game_service::get_or_create_game(&state, &identity.user_id).await?;
    Ok(Json(view))
}

#[utoipa::path(
    get,
    path = "/game/easy-items",
    tag = "game",
    responses((status = 200, description = "Up to three easy unplayed items", body = EasyItemsResponse))
)]
/// Preview the easiest still-unplayed items on the caller's board.
pub async fn easy_items(
    State(state): State<SharedState>,
    VerifiedPlayer(identity): VerifiedPlayer,
) -> Result<Json<EasyItemsResponse>, AppError> {
    let items = game_service::easy_items(&state, &identity.user_id).await?;
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/game/items/{id}/toggle",
    tag = "game",
    params(("id" = Uuid, Path, description = "Catalog item to toggle")),
    responses(
        (status = 200, description = "Game after the toggle", body = GameSummary),
        (status = 404, description = "Item does not exist"),
        (status = 409, description = "Item is not on the caller's board")
    )
)]
/// Toggle completion of one board cell.
pub async fn toggle_item(
    State(state): State<SharedState>,
    VerifiedPlayer(identity): VerifiedPlayer,
    Path(id): Path<Uuid>,
) -> Result<Json<GameSummary>, AppError> {
    let summary = game_service::toggle_item(&state, &identity.user_id, id).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    post,
    path = "/game/easy-complete",
    tag = "game",
    responses(
        (status = 200, description = "Game and the completion that was applied", body = EasyCompleteResponse),
        (status = 409, description = "Game already complete, or no easy item available")
    )
)]
/// Auto-complete the cheapest easy item on the caller's board.
pub async fn complete_easy_item(
    State(state): State<SharedState>,
    VerifiedPlayer(identity): VerifiedPlayer,
) -> Result<Json<EasyCompleteResponse>, AppError> {
    let response = game_service::complete_easy_item(&state, &identity.user_id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/game/reset",
    tag = "game",
    responses(
        (status = 200, description = "Game after the reset", body = GameSummary),
        (status = 404, description = "No game exists for the caller")
    )
)]
/// Clear the caller's completion state, preserving the board.
pub async fn reset_game(
    State(state): State<SharedState>,
    VerifiedPlayer(identity): VerifiedPlayer,
) -> Result<Json<GameSummary>, AppError> {
    let summary = game_service::reset_game(&state, &identity.user_id).await?;
    Ok(Json(summary))
}
