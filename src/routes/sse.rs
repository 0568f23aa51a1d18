use std::convert::Infallible;

use axum::{Router, extract::State, response::sse::Sse, routing::get};
use futures::Stream;
use tracing::info;

use crate::{services::sse_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/sse/game",
    responses((status = 200, description = "Live game event stream", content_type = "text/event-stream", body = String))
)]
/// Stream realtime game events (`item.completed`, `bingo.achieved`,
/// `game.updated`) to connected frontends.
pub async fn game_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let receiver = sse_service::subscribe_game(&state);
    info!("New game SSE connection");
    sse_service::broadcast_handshake(state.game_sse(), state.is_degraded());
    sse_service::to_sse_stream(receiver)
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/sse/game", get(game_stream))
}
