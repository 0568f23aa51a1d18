//! Best-effort lookup of player display profiles from the external identity
//! service.
//!
//! The leaderboard only needs display fields; a failed or missing lookup
//! degrades to placeholder values and never fails the calling operation.

use std::time::Duration;

use futures::future::BoxFuture;
use serde::Deserialize;
use tracing::warn;

/// Display profile of a player as served by the identity service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEntity {
    /// Name to display on leaderboards.
    pub display_name: String,
    /// Avatar image, when the player has one.
    pub avatar_url: Option<String>,
}

/// Abstraction over the external identity service's profile endpoint.
pub trait ProfileLookup: Send + Sync {
    /// Fetch a player's display profile; `None` on any failure.
    fn find_profile(&self, user_id: &str) -> BoxFuture<'static, Option<ProfileEntity>>;
}

/// Lookup used when no identity service is configured; always misses.
pub struct NullProfileLookup;

impl ProfileLookup for NullProfileLookup {
    fn find_profile(&self, _user_id: &str) -> BoxFuture<'static, Option<ProfileEntity>> {
        Box::pin(async { None })
    }
}

const PROFILE_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// HTTP client for the identity service's `/users/{id}` endpoint.
#[derive(Clone)]
pub struct HttpProfileClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpProfileClient {
    /// Build a client for the given identity service base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(PROFILE_REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.into(),
            client,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawProfile {
    display_name: String,
    #[serde(default)]
    avatar_url: Option<String>,
}

impl ProfileLookup for HttpProfileClient {
    fn find_profile(&self, user_id: &str) -> BoxFuture<'static, Option<ProfileEntity>> {
        let url = format!(
            "{}/users/{}",
            self.base_url.trim_end_matches('/'),
            user_id
        );
        let client = self.client.clone();
        let user_id = user_id.to_owned();

        Box::pin(async move {
            let response = match client.get(&url).send().await {
                Ok(response) => response,
                Err(err) => {
                    warn!(user_id, error = %err, "profile lookup request failed");
                    return None;
                }
            };

            if !response.status().is_success() {
                warn!(user_id, status = %response.status(), "profile lookup miss");
                return None;
            }

            match response.json::<RawProfile>().await {
                Ok(raw) => Some(ProfileEntity {
                    display_name: raw.display_name,
                    avatar_url: raw.avatar_url,
                }),
                Err(err) => {
                    warn!(user_id, error = %err, "profile payload malformed");
                    None
                }
            }
        })
    }
}

/// Placeholder display name shown when the profile lookup misses.
pub fn placeholder_display_name(user_id: &str) -> String {
    let tag: String = user_id.chars().take(8).collect();
    format!("Participant {tag}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_uses_a_short_identity_tag() {
        assert_eq!(
            placeholder_display_name("abcdef1234567890"),
            "Participant abcdef12"
        );
        assert_eq!(placeholder_display_name("xy"), "Participant xy");
    }
}
