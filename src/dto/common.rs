use serde::Deserialize;
use utoipa::ToSchema;

/// Marker type for endpoints that accept no query parameters.
#[derive(Debug, Deserialize, ToSchema)]
pub struct NoQuery {}
