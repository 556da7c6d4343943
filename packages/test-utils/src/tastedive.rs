//! Mock TasteDive API for testing similar-artist expansion

use serde_json::{json, Value};
use tunebridge_shared_config::TasteDiveConfig;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// API key baked into [`MockTasteDiveServer::config`]
pub const MOCK_TASTEDIVE_KEY: &str = "mock-tastedive-key";

/// Mock TasteDive server
pub struct MockTasteDiveServer {
    server: MockServer,
}

impl MockTasteDiveServer {
    /// Start a new mock server
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Get the server URL
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// TasteDive configuration pointing at this server
    pub fn config(&self) -> TasteDiveConfig {
        TasteDiveConfig::new(format!("{}/api", self.url()), MOCK_TASTEDIVE_KEY)
    }

    /// Get reference to the underlying mock server for custom mock setups
    pub fn inner(&self) -> &MockServer {
        &self.server
    }

    /// Mount similar results for an exact query
    pub async fn mock_similar(&self, query: &str, names: &[&str]) {
        let results: Vec<Value> = names
            .iter()
            .map(|name| json!({"name": name, "type": "music"}))
            .collect();

        Mock::given(method("GET"))
            .and(path("/api/similar"))
            .and(query_param("q", query))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "similar": {
                    "info": [{"name": query, "type": "music"}],
                    "results": results
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Answer every otherwise unmatched query with no results
    pub async fn mock_no_results(&self) {
        Mock::given(method("GET"))
            .and(path("/api/similar"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "similar": {"info": [], "results": []}
            })))
            .with_priority(10)
            .mount(&self.server)
            .await;
    }

    /// Make every lookup fail with the given status
    pub async fn mock_failure(&self, status_code: u16) {
        Mock::given(method("GET"))
            .and(path("/api/similar"))
            .respond_with(ResponseTemplate::new(status_code).set_body_string("unavailable"))
            .mount(&self.server)
            .await;
    }

    /// Number of `similar` lookups received
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == "/api/similar")
            .count()
    }
}
