//! Client-credentials token cache
//!
//! One token per process. The cache lock is held across the exchange, so
//! callers that find the token expired at the same time wait for a single
//! refresh instead of each issuing their own.

use std::fmt;
use std::time::{Duration, Instant};

use reqwest::Client;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{SpotifyError, SpotifyResult};
use crate::models::TokenResponse;

/// A bearer token and the instant it stops being valid
#[derive(Clone)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: Instant,
}

impl AccessToken {
    /// Build a token that expires `expires_in` after `issued_at`
    pub fn new(value: impl Into<String>, issued_at: Instant, expires_in: Duration) -> Self {
        Self {
            value: value.into(),
            expires_at: issued_at + expires_in,
        }
    }

    /// Valid strictly before `expires_at`
    pub fn is_valid_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Lazily fetched, single-flight refreshed client-credentials token
pub struct TokenCache {
    http_client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    current: Mutex<Option<AccessToken>>,
}

impl fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCache")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

impl TokenCache {
    pub fn new(
        http_client: Client,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            current: Mutex::new(None),
        }
    }

    /// Return the cached token, exchanging credentials first if it is
    /// missing or expired
    ///
    /// # Errors
    /// `SpotifyError::Auth` when the exchange is rejected or unparseable,
    /// `SpotifyError::Http` / `Timeout` when it cannot be sent.
    pub async fn token(&self) -> SpotifyResult<String> {
        let mut current = self.current.lock().await;

        if let Some(token) = current.as_ref() {
            if token.is_valid_at(Instant::now()) {
                return Ok(token.value.clone());
            }
            debug!("Spotify access token expired, refreshing");
        }

        let fresh = self.exchange().await?;
        let value = fresh.value.clone();
        *current = Some(fresh);
        Ok(value)
    }

    async fn exchange(&self) -> SpotifyResult<AccessToken> {
        let issued_at = Instant::now();

        let response = self
            .http_client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(SpotifyError::from_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(SpotifyError::from_transport)?;

        if !status.is_success() {
            warn!(status = status.as_u16(), body = %body, "Spotify token exchange rejected");
            return Err(SpotifyError::Auth(format!("status {}", status.as_u16())));
        }

        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| SpotifyError::Auth(format!("invalid token response: {}", e)))?;

        debug!(expires_in = parsed.expires_in, "Obtained Spotify access token");

        Ok(AccessToken::new(
            parsed.access_token,
            issued_at,
            Duration::from_secs(parsed.expires_in),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn cache_for(server: &MockServer) -> TokenCache {
        TokenCache::new(
            Client::new(),
            format!("{}/api/token", server.uri()),
            "client-id",
            "client-secret",
        )
    }

    async fn mount_token(server: &MockServer, expires_in: u64, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/api/token"))
            // base64("client-id:client-secret")
            .and(header(
                "authorization",
                "Basic Y2xpZW50LWlkOmNsaWVudC1zZWNyZXQ=",
            ))
            .and(body_string_contains("grant_type=client_credentials"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "token-abc",
                "token_type": "Bearer",
                "expires_in": expires_in
            })))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    #[test]
    fn test_access_token_validity_window() {
        let now = Instant::now();
        let token = AccessToken::new("t", now, Duration::from_secs(3600));
        assert!(token.is_valid_at(now));
        assert!(!token.is_valid_at(now + Duration::from_secs(3600)));
    }

    #[test]
    fn test_access_token_debug_redacts_value() {
        let token = AccessToken::new("very-secret", Instant::now(), Duration::from_secs(1));
        assert!(!format!("{:?}", token).contains("very-secret"));
    }

    #[tokio::test]
    async fn test_token_reused_within_lifetime() {
        let server = MockServer::start().await;
        mount_token(&server, 3600, 1).await;

        let cache = cache_for(&server);
        assert_eq!(cache.token().await.unwrap(), "token-abc");
        assert_eq!(cache.token().await.unwrap(), "token-abc");
        // MockServer verifies `expect(1)` on drop
    }

    #[tokio::test]
    async fn test_expired_token_is_refreshed() {
        let server = MockServer::start().await;
        mount_token(&server, 0, 2).await;

        let cache = cache_for(&server);
        cache.token().await.unwrap();
        cache.token().await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_exchange() {
        let server = MockServer::start().await;
        mount_token(&server, 3600, 1).await;

        let cache = Arc::new(cache_for(&server));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.token().await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "token-abc");
        }
    }

    #[tokio::test]
    async fn test_rejected_exchange_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_client"})),
            )
            .mount(&server)
            .await;

        let err = cache_for(&server).token().await.unwrap_err();
        assert_matches!(err, SpotifyError::Auth(_));
    }

    #[tokio::test]
    async fn test_malformed_token_response_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"nope": true})))
            .mount(&server)
            .await;

        let err = cache_for(&server).token().await.unwrap_err();
        assert_matches!(err, SpotifyError::Auth(message) if message.contains("invalid token response"));
    }
}
