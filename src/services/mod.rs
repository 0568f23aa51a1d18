/// Catalog item management and default-catalog seeding.
pub mod catalog_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Core game logic orchestration: locks, persistence, event publication.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Ranked summaries and aggregate statistics.
pub mod leaderboard_service;
/// External identity profile lookup.
pub mod profile_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Storage connection supervision and degraded mode.
pub mod storage_supervisor;
