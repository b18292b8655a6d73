use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::core::currency::{DISPLAY_CURRENCIES, PIVOT_CURRENCY};
use crate::core::source::{ProviderError, RateSource};

/// Base currency the provider quotes against. The free tier forces this, so
/// every request pins it and the proxy rebases the result afterwards.
pub const PROVIDER_BASE: &str = "EUR";

// ExchangeRatesApi implementation for RateSource
pub struct ExchangeRatesApi {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl ExchangeRatesApi {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        ExchangeRatesApi {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    rates: Option<HashMap<String, f64>>,
}

#[async_trait]
impl RateSource for ExchangeRatesApi {
    #[instrument(name = "LatestRatesFetch", skip(self))]
    async fn latest_rates(&self) -> Result<HashMap<String, f64>, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingApiKey)?;

        let symbols = format!("{},{}", DISPLAY_CURRENCIES.join(","), PIVOT_CURRENCY);
        let url = format!(
            "{}/v1/latest?access_key={}&base={}&symbols={}",
            self.base_url, api_key, PROVIDER_BASE, symbols
        );
        debug!(base = PROVIDER_BASE, symbols = %symbols, "Requesting latest rates");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let parsed: LatestResponse =
            serde_json::from_str(&text).map_err(|e| ProviderError::Malformed(e.to_string()))?;

        parsed.rates.ok_or(ProviderError::MissingRates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/latest"))
            .and(query_param("access_key", "test-key"))
            .and(query_param("base", "EUR"))
            .and(query_param("symbols", "USD,EUR,CHF,AUD,CAD,GBP"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn provider(uri: &str) -> ExchangeRatesApi {
        ExchangeRatesApi::new(uri, Some("test-key".to_string()))
    }

    #[tokio::test]
    async fn test_successful_rates_fetch() {
        let mock_response = r#"{
            "base": "EUR",
            "rates": {
                "USD": 1.10,
                "GBP": 0.85,
                "CHF": 0.95
            }
        }"#;

        let mock_server = create_mock_server(mock_response).await;
        let rates = provider(&mock_server.uri()).latest_rates().await.unwrap();

        assert_eq!(rates.len(), 3);
        assert_eq!(rates["USD"], 1.10);
        assert_eq!(rates["GBP"], 0.85);
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_any_request() {
        let mock_server = MockServer::start().await;
        let provider = ExchangeRatesApi::new(&mock_server.uri(), None);

        let result = provider.latest_rates().await;
        assert!(matches!(result, Err(ProviderError::MissingApiKey)));
        assert!(mock_server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_status_carries_body_for_logs() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/latest"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string(r#"{"error":"invalid_access_key"}"#),
            )
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server.uri()).latest_rates().await;
        match result {
            Err(ProviderError::Status { status, body }) => {
                assert_eq!(status, 401);
                assert!(body.contains("invalid_access_key"));
            }
            other => panic!("Expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let mock_server = create_mock_server("not json at all").await;

        let result = provider(&mock_server.uri()).latest_rates().await;
        assert!(matches!(result, Err(ProviderError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_body_without_rates_object_is_rejected() {
        let mock_server = create_mock_server(r#"{"success": false}"#).await;

        let result = provider(&mock_server.uri()).latest_rates().await;
        assert!(matches!(result, Err(ProviderError::MissingRates)));
    }
}
