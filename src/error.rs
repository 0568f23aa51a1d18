//! Two-layer error taxonomy: [`ServiceError`] in the service layer, mapped
//! to [`AppError`] HTTP responses. Every response body carries a stable
//! machine-readable `code` distinct from the human-readable message, so
//! clients branch on the code.

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::{
    dao::storage::StorageError,
    game::{
        board::InsufficientCatalog,
        engine::{EasyCompleteError, ItemNotOnBoard},
    },
};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage backend failed to serve the request; safe to retry with
    /// backoff at the caller's discretion. The core never retries since
    /// mutations are not idempotent at the store layer.
    #[error("storage unavailable")]
    Unavailable(#[source] StorageError),
    /// Application is running in degraded mode without storage.
    #[error("storage unavailable (degraded mode)")]
    Degraded,
    /// Malformed input, rejected before any state mutation.
    #[error("invalid input: {0}")]
    Validation(String),
    /// The referenced catalog item does not exist.
    #[error("item `{0}` not found")]
    ItemNotFound(Uuid),
    /// The item exists but is not on the caller's board.
    #[error("item `{0}` is not on this board")]
    ItemNotOnBoard(Uuid),
    /// The caller has no game record yet.
    #[error("no game found for user `{0}`")]
    GameNotFound(String),
    /// The game already has a bingo; easy auto-completion is disabled.
    #[error("game is already completed")]
    GameAlreadyComplete,
    /// No uncompleted board item matches the easy policy.
    #[error("no easy item left on this board")]
    NoEasyItemAvailable,
    /// The active catalog is too small to generate a board.
    #[error("insufficient catalog: {available} active items (need 16)")]
    InsufficientCatalog {
        /// Number of active items that were available.
        available: usize,
    },
    /// Caller is not authenticated.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Caller is authenticated but lacks the required role.
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// Caller is authenticated but has not verified their email address.
    #[error("email address is not verified")]
    EmailNotVerified,
    /// Invariant violation that should not happen.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Unavailable(_) | ServiceError::Degraded => "STORE_UNAVAILABLE",
            ServiceError::Validation(_) => "VALIDATION",
            ServiceError::ItemNotFound(_) => "ITEM_NOT_FOUND",
            ServiceError::ItemNotOnBoard(_) => "ITEM_NOT_ON_BOARD",
            ServiceError::GameNotFound(_) => "GAME_NOT_FOUND",
            ServiceError::GameAlreadyComplete => "GAME_ALREADY_COMPLETE",
            ServiceError::NoEasyItemAvailable => "NO_EASY_ITEM",
            ServiceError::InsufficientCatalog { .. } => "INSUFFICIENT_CATALOG",
            ServiceError::Unauthorized(_) => "AUTH_REQUIRED",
            ServiceError::Forbidden(_) => "FORBIDDEN",
            ServiceError::EmailNotVerified => "EMAIL_NOT_VERIFIED",
            ServiceError::Internal(_) => "INTERNAL",
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Unavailable(err)
    }
}

impl From<InsufficientCatalog> for ServiceError {
    fn from(err: InsufficientCatalog) -> Self {
        ServiceError::InsufficientCatalog {
            available: err.available,
        }
    }
}

impl From<ItemNotOnBoard> for ServiceError {
    fn from(err: ItemNotOnBoard) -> Self {
        ServiceError::ItemNotOnBoard(err.0)
    }
}

impl From<EasyCompleteError> for ServiceError {
    fn from(err: EasyCompleteError) -> Self {
        match err {
            EasyCompleteError::GameAlreadyComplete => ServiceError::GameAlreadyComplete,
            EasyCompleteError::NoEasyItemAvailable => ServiceError::NoEasyItemAvailable,
        }
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {message}")]
    BadRequest {
        /// Stable machine-readable code.
        code: &'static str,
        /// Human-readable description.
        message: String,
    },
    /// Missing or unusable caller identity.
    #[error("unauthorized: {message}")]
    Unauthorized {
        /// Stable machine-readable code.
        code: &'static str,
        /// Human-readable description.
        message: String,
    },
    /// Authenticated but not allowed (role or verification).
    #[error("forbidden: {message}")]
    Forbidden {
        /// Stable machine-readable code.
        code: &'static str,
        /// Human-readable description.
        message: String,
    },
    /// Requested resource not found.
    #[error("not found: {message}")]
    NotFound {
        /// Stable machine-readable code.
        code: &'static str,
        /// Human-readable description.
        message: String,
    },
    /// Conflict with current state.
    #[error("conflict: {message}")]
    Conflict {
        /// Stable machine-readable code.
        code: &'static str,
        /// Human-readable description.
        message: String,
    },
    /// Service unavailable or degraded.
    #[error("service unavailable: {message}")]
    ServiceUnavailable {
        /// Stable machine-readable code.
        code: &'static str,
        /// Human-readable description.
        message: String,
    },
    /// Internal server error.
    #[error("internal error: {message}")]
    Internal {
        /// Stable machine-readable code.
        code: &'static str,
        /// Human-readable description.
        message: String,
    },
}

impl AppError {
    /// Missing or unusable caller identity.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Unauthorized {
            code: "AUTH_REQUIRED",
            message: message.into(),
        }
    }

    /// Authenticated but lacking the required role.
    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::Forbidden {
            code: "FORBIDDEN",
            message: message.into(),
        }
    }

    /// Authenticated but the email address is not verified.
    pub fn email_not_verified() -> Self {
        AppError::Forbidden {
            code: "EMAIL_NOT_VERIFIED",
            message: "email address is not verified".into(),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let code = err.code();
        let message = err.to_string();
        match err {
            ServiceError::Unavailable(_) | ServiceError::Degraded => {
                AppError::ServiceUnavailable { code, message }
            }
            ServiceError::Validation(_) => AppError::BadRequest { code, message },
            ServiceError::ItemNotFound(_) | ServiceError::GameNotFound(_) => {
                AppError::NotFound { code, message }
            }
            ServiceError::ItemNotOnBoard(_)
            | ServiceError::GameAlreadyComplete
            | ServiceError::NoEasyItemAvailable
            | ServiceError::InsufficientCatalog { .. } => AppError::Conflict { code, message },
            ServiceError::Unauthorized(_) => AppError::Unauthorized { code, message },
            ServiceError::Forbidden(_) => AppError::Forbidden { code, message },
            ServiceError::EmailNotVerified => AppError::Forbidden { code, message },
            ServiceError::Internal(_) => AppError::Internal { code, message },
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest {
            code: "VALIDATION",
            message: format!("validation failed: {err}"),
        }
    }
}

/// Error payload returned on every non-success response.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    /// Stable machine-readable code clients can branch on.
    pub code: &'static str,
    /// Human-readable description.
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let (code, message) = match self {
            AppError::BadRequest { code, message }
            | AppError::Unauthorized { code, message }
            | AppError::Forbidden { code, message }
            | AppError::NotFound { code, message }
            | AppError::Conflict { code, message }
            | AppError::ServiceUnavailable { code, message }
            | AppError::Internal { code, message } => (code, message),
        };

        (status, Json(ErrorBody { code, message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_service_error_keeps_a_distinct_conflict_code() {
        // Clients distinguish the 409 family purely by code.
        let conflicts = [
            ServiceError::ItemNotOnBoard(Uuid::nil()),
            ServiceError::GameAlreadyComplete,
            ServiceError::NoEasyItemAvailable,
            ServiceError::InsufficientCatalog { available: 3 },
        ];
        let codes = conflicts.iter().map(ServiceError::code).collect::<Vec<_>>();
        let mut deduped = codes.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(codes.len(), deduped.len());
    }

    #[test]
    fn email_verification_failure_is_distinguishable_from_plain_forbidden() {
        assert_eq!(ServiceError::EmailNotVerified.code(), "EMAIL_NOT_VERIFIED");
        assert_eq!(ServiceError::Forbidden("nope".into()).code(), "FORBIDDEN");
    }
}
