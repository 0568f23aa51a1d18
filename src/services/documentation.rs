use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the sustainability bingo backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::game_stream,
        crate::routes::game::get_game,
        crate::routes::game::easy_items,
        crate::routes::game::toggle_item,
        crate::routes::game::complete_easy_item,
        crate::routes::game::reset_game,
        crate::routes::public::get_items,
        crate::routes::public::get_leaderboard,
        crate::routes::public::get_stats,
        crate::routes::admin::create_item,
        crate::routes::admin::update_item,
        crate::routes::admin::refresh_catalog,
        crate::routes::admin::refresh_boards,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::catalog::ItemSummary,
            crate::dto::catalog::ItemsResponse,
            crate::dto::catalog::CreateItemRequest,
            crate::dto::catalog::UpdateItemRequest,
            crate::dto::catalog::CatalogRefreshResponse,
            crate::dto::catalog::BoardsRefreshResponse,
            crate::dto::game::GameSummary,
            crate::dto::game::GameView,
            crate::dto::game::BoardCellView,
            crate::dto::game::BoardEntrySummary,
            crate::dto::game::CompletedItemSummary,
            crate::dto::game::BingoPatternSummary,
            crate::dto::game::EasyCompleteResponse,
            crate::dto::game::EasyItemsResponse,
            crate::dto::leaderboard::LeaderboardEntry,
            crate::dto::leaderboard::LeaderboardResponse,
            crate::dto::leaderboard::StatsResponse,
            crate::dto::sse::Handshake,
            crate::dto::sse::SystemStatus,
            crate::dto::sse::ItemCompletedEvent,
            crate::dto::sse::BingoAchievedEvent,
            crate::dto::sse::GameUpdatedEvent,
            crate::dao::models::ItemCategory,
            crate::dao::models::PatternKind,
            crate::error::ErrorBody,
        )
    ),
    tags(
        (name = "game", description = "Player game operations"),
        (name = "public", description = "Public catalog, leaderboard, and stats"),
        (name = "admin", description = "Catalog and board management"),
        (name = "sse", description = "Server-sent events stream"),
    )
)]
pub struct ApiDoc;
