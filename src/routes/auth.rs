//! Caller identity extractors.
//!
//! Authentication itself is an external collaborator: an upstream gateway
//! terminates the session and injects identity headers. This module only
//! maps those headers to typed extractors and enforces the two gates the
//! API needs: verified email for player operations, admin role for
//! management operations. Admin operations do not require a verified email.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

const USER_ID_HEADER: &str = "x-user-id";
const USER_ROLE_HEADER: &str = "x-user-role";
const EMAIL_VERIFIED_HEADER: &str = "x-user-email-verified";

/// Role granted by the identity collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Event staff allowed to manage the catalog and boards.
    Admin,
    /// Regular participant.
    Player,
}

/// Identity of the authenticated caller as asserted by the gateway.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    /// Stable external user id.
    pub user_id: String,
    /// Granted role.
    pub role: Role,
    /// Whether the caller's email address has been verified.
    pub email_verified: bool,
}

impl CallerIdentity {
    fn from_parts(parts: &Parts) -> Result<Self, AppError> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::unauthorized("missing identity header `X-User-Id`"))?
            .to_owned();

        let role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| {
                if value.eq_ignore_ascii_case("admin") {
                    Role::Admin
                } else {
                    Role::Player
                }
            })
            .unwrap_or(Role::Player);

        let email_verified = parts
            .headers
            .get(EMAIL_VERIFIED_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.eq_ignore_ascii_case("true") || value == "1")
            .unwrap_or(false);

        Ok(Self {
            user_id,
            role,
            email_verified,
        })
    }
}

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_parts(parts)
    }
}

/// Extractor for operations requiring an authenticated caller with a
/// verified email address.
#[derive(Debug, Clone)]
pub struct VerifiedPlayer(pub CallerIdentity);

impl<S> FromRequestParts<S> for VerifiedPlayer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = CallerIdentity::from_parts(parts)?;
        if !identity.email_verified {
            return Err(AppError::email_not_verified());
        }
        Ok(Self(identity))
    }
}

/// Extractor for admin-only operations.
#[derive(Debug, Clone)]
pub struct AdminUser(pub CallerIdentity);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = CallerIdentity::from_parts(parts)?;
        if identity.role != Role::Admin {
            return Err(AppError::forbidden("admin role required"));
        }
        Ok(Self(identity))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/game");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn identity_requires_a_user_id() {
        let err = CallerIdentity::from_parts(&parts(&[])).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));

        let err = CallerIdentity::from_parts(&parts(&[("x-user-id", "  ")])).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));
    }

    #[test]
    fn role_defaults_to_player() {
        let identity = CallerIdentity::from_parts(&parts(&[("x-user-id", "u1")])).unwrap();
        assert_eq!(identity.role, Role::Player);
        assert!(!identity.email_verified);
    }

    #[test]
    fn admin_role_is_parsed_case_insensitively() {
        let identity = CallerIdentity::from_parts(&parts(&[
            ("x-user-id", "u1"),
            ("x-user-role", "ADMIN"),
        ]))
        .unwrap();
        assert_eq!(identity.role, Role::Admin);
    }

    #[tokio::test]
    async fn verified_gate_rejects_unverified_callers_with_a_dedicated_code() {
        let mut unverified = parts(&[("x-user-id", "u1"), ("x-user-email-verified", "false")]);
        let err = <VerifiedPlayer as FromRequestParts<()>>::from_request_parts(&mut unverified, &())
            .await
            .unwrap_err();
        match err {
            AppError::Forbidden { code, .. } => assert_eq!(code, "EMAIL_NOT_VERIFIED"),
            other => panic!("unexpected error: {other:?}"),
        }

        let mut verified = parts(&[("x-user-id", "u1"), ("x-user-email-verified", "true")]);
        let player = <VerifiedPlayer as FromRequestParts<()>>::from_request_parts(&mut verified, &())
            .await
            .unwrap();
        assert_eq!(player.0.user_id, "u1");
    }

    #[tokio::test]
    async fn admin_gate_does_not_require_verification() {
        let mut admin = parts(&[("x-user-id", "staff"), ("x-user-role", "admin")]);
        let user = <AdminUser as FromRequestParts<()>>::from_request_parts(&mut admin, &())
            .await
            .unwrap();
        assert!(!user.0.email_verified);

        let mut player = parts(&[("x-user-id", "u1"), ("x-user-email-verified", "true")]);
        let err = <AdminUser as FromRequestParts<()>>::from_request_parts(&mut player, &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }
}
