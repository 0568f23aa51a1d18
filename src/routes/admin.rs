use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{post, put},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::catalog::{
        BoardsRefreshResponse, CatalogRefreshResponse, CreateItemRequest, ItemSummary,
        UpdateItemRequest,
    },
    error::AppError,
    routes::auth::AdminUser,
    services::{catalog_service, game_service},
    state::SharedState,
};

/// Admin-only management endpoints for the catalog and player boards.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/admin/items", post(create_item))
        .route("/admin/items/{id}", put(update_item))
        .route("/admin/catalog/refresh", post(refresh_catalog))
        .route("/admin/boards/refresh", post(refresh_boards))
}

#[utoipa::path(
    post,
    path = "/admin/items",
    tag = "admin",
    request_body = CreateItemRequest,
    responses(
        (status = 200, description = "Item created", body = ItemSummary),
        (status = 400, description = "Invalid item payload"),
        (status = 403, description = "Admin role required")
    )
)]
/// Create a new catalog item.
pub async fn create_item(
    State(state): State<SharedState>,
    AdminUser(identity): AdminUser,
    Json(payload): Json<CreateItemRequest>,
) -> Result<Json<ItemSummary>, AppError> {
    payload.validate()?;
    let summary = catalog_service::create_item(&state, &identity.user_id, payload).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    put,
    path = "/admin/items/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Identifier of the item to update")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated", body = ItemSummary),
        (status = 404, description = "Item does not exist")
    )
)]
/// Update an existing catalog item; items are never deleted, only
/// deactivated.
pub async fn update_item(
    State(state): State<SharedState>,
    AdminUser(_identity): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<Json<ItemSummary>, AppError> {
    payload.validate()?;
    let summary = catalog_service::update_item(&state, id, payload).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    post,
    path = "/admin/catalog/refresh",
    tag = "admin",
    responses((status = 200, description = "Default catalog re-seeded", body = CatalogRefreshResponse))
)]
/// Re-seed the built-in default catalog.
pub async fn refresh_catalog(
    State(state): State<SharedState>,
    AdminUser(_identity): AdminUser,
) -> Result<Json<CatalogRefreshResponse>, AppError> {
    let response = catalog_service::refresh_catalog(&state).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/admin/boards/refresh",
    tag = "admin",
    responses(
        (status = 200, description = "Every player's board regenerated", body = BoardsRefreshResponse),
        (status = 409, description = "Active catalog too small to generate boards")
    )
)]
/// Regenerate every player's board, discarding their completions.
pub async fn refresh_boards(
    State(state): State<SharedState>,
    AdminUser(_identity): AdminUser,
) -> Result<Json<BoardsRefreshResponse>, AppError> {
    let response = game_service::refresh_all_boards(&state).await?;
    Ok(Json(response))
}
