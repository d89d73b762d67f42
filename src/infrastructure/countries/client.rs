//! HTTP client for the country data provider

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::domain::DomainError;

/// Trait for provider requests (for mocking)
#[async_trait]
pub trait CountriesClient: Send + Sync + std::fmt::Debug {
    /// Fetch a JSON document from the provider
    async fn get_json(&self, path: &str) -> Result<Value, DomainError>;
}

/// Real provider client using reqwest
#[derive(Debug, Clone)]
pub struct HttpCountriesClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCountriesClient {
    /// Create a client for the given provider base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Create a client with a request timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout: std::time::Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl CountriesClient for HttpCountriesClient {
    async fn get_json(&self, path: &str) -> Result<Value, DomainError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        debug!(%url, "Requesting country data");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DomainError::upstream(format!("Country provider request failed: {}", e)))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DomainError::not_found("No matching countries"));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::upstream(format!(
                "Country provider returned HTTP {}: {}",
                status, body
            )));
        }

        response.json().await.map_err(|e| {
            DomainError::upstream(format!("Country provider returned invalid JSON: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_json_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"name": {"common": "France"}}])))
            .mount(&server)
            .await;

        let client = HttpCountriesClient::new(server.uri());
        let value = client.get_json("all").await.unwrap();

        assert!(value.is_array());
        assert_eq!(value[0]["name"]["common"], "France");
    }

    #[tokio::test]
    async fn test_get_json_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/name/atlantis"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"status": 404})))
            .mount(&server)
            .await;

        let client = HttpCountriesClient::new(server.uri());
        let result = client.get_json("name/atlantis").await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_get_json_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/all"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = HttpCountriesClient::new(server.uri());
        let result = client.get_json("all").await;

        assert!(matches!(result, Err(DomainError::Upstream { .. })));
    }

    #[tokio::test]
    async fn test_get_json_invalid_payload() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/all"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = HttpCountriesClient::new(server.uri());
        let result = client.get_json("all").await;

        assert!(matches!(result, Err(DomainError::Upstream { .. })));
    }

    #[tokio::test]
    async fn test_unreachable_provider() {
        // Port 1 is never listening
        let client = HttpCountriesClient::with_timeout(
            "http://127.0.0.1:1",
            std::time::Duration::from_millis(200),
        );

        let result = client.get_json("all").await;
        assert!(matches!(result, Err(DomainError::Upstream { .. })));
    }
}
