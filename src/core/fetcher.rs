use crate::config::toml_config::FeedConfig;
use crate::domain::ports::FeedSource;
use crate::utils::error::{AppError, Result, DEFAULT_UPSTREAM_MESSAGE};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

pub const UPSTREAM_OK: i64 = 200;
const FALLBACK_UPSTREAM_CODE: u16 = 500;

/// Fetches the feed envelope `{"RC": .., "RCM": .., "DATA": ..}` with one GET.
#[derive(Debug, Clone)]
pub struct HttpFeedFetcher {
    client: Client,
    endpoint: String,
}

impl HttpFeedFetcher {
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        let client = builder
            .build()
            .map_err(|e| AppError::config("feed", format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl FeedSource for HttpFeedFetcher {
    async fn fetch(&self) -> Result<String> {
        tracing::debug!("Making feed request to: {}", self.endpoint);

        let response = self.client.get(&self.endpoint).send().await.map_err(|e| {
            tracing::warn!("Feed request failed: {}", e);
            AppError::Fetch {
                detail: e.to_string(),
            }
        })?;

        let status = response.status();
        tracing::debug!("Feed response status: {}", status);

        let body = response.text().await.map_err(|e| AppError::Fetch {
            detail: e.to_string(),
        })?;

        // 非 JSON 回應視同上游錯誤，沒有 RC/RCM 可用
        let envelope: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
        let result_code = envelope.get("RC").and_then(Value::as_i64);

        if status.is_success() && result_code == Some(UPSTREAM_OK) {
            let payload = match envelope.get("DATA") {
                Some(Value::String(data)) => data.clone(),
                _ => {
                    tracing::warn!("Feed envelope has no DATA string, treating as empty");
                    String::new()
                }
            };
            return Ok(payload);
        }

        let message = envelope
            .get("RCM")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_UPSTREAM_MESSAGE)
            .to_string();
        let code = result_code
            .and_then(|rc| u16::try_from(rc).ok())
            .unwrap_or(FALLBACK_UPSTREAM_CODE);

        tracing::warn!(
            http_status = status.as_u16(),
            upstream_code = ?result_code,
            "Feed reported an error: {}",
            message
        );

        Err(AppError::Upstream { code, message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn config(endpoint: String) -> FeedConfig {
        FeedConfig {
            endpoint,
            timeout_seconds: Some(5),
        }
    }

    #[tokio::test]
    async fn test_fetch_returns_payload_unchanged() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/feed");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(serde_json::json!({
                        "RC": 200,
                        "RCM": "OK",
                        "DATA": "NAMA|NIM\nTurner Mia|9352078461\n"
                    }));
            })
            .await;

        let fetcher = HttpFeedFetcher::new(&config(server.url("/feed"))).unwrap();
        let payload = fetcher.fetch().await.unwrap();

        api_mock.assert_async().await;
        assert_eq!(payload, "NAMA|NIM\nTurner Mia|9352078461\n");
    }

    #[tokio::test]
    async fn test_fetch_upstream_error_code_and_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/feed");
                then.status(200)
                    .json_body(serde_json::json!({"RC": 500, "RCM": "down"}));
            })
            .await;

        let fetcher = HttpFeedFetcher::new(&config(server.url("/feed"))).unwrap();
        let err = fetcher.fetch().await.unwrap_err();

        match err {
            AppError::Upstream { code, message } => {
                assert_eq!(code, 500);
                assert_eq!(message, "down");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_missing_code_uses_defaults() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/feed");
                then.status(200).json_body(serde_json::json!({"DATA": "NAMA"}));
            })
            .await;

        let fetcher = HttpFeedFetcher::new(&config(server.url("/feed"))).unwrap();
        let err = fetcher.fetch().await.unwrap_err();

        match err {
            AppError::Upstream { code, message } => {
                assert_eq!(code, 500);
                assert_eq!(message, DEFAULT_UPSTREAM_MESSAGE);
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_string_result_code_is_not_success() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/feed");
                then.status(200)
                    .json_body(serde_json::json!({"RC": "200", "RCM": "OK", "DATA": "NAMA"}));
            })
            .await;

        let fetcher = HttpFeedFetcher::new(&config(server.url("/feed"))).unwrap();
        assert!(matches!(
            fetcher.fetch().await,
            Err(AppError::Upstream { code: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_http_error_without_json_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/feed");
                then.status(502).body("Bad Gateway");
            })
            .await;

        let fetcher = HttpFeedFetcher::new(&config(server.url("/feed"))).unwrap();
        match fetcher.fetch().await.unwrap_err() {
            AppError::Upstream { code, message } => {
                assert_eq!(code, 500);
                assert_eq!(message, DEFAULT_UPSTREAM_MESSAGE);
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_http_error_with_envelope_keeps_upstream_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/feed");
                then.status(503)
                    .json_body(serde_json::json!({"RC": 200, "RCM": "maintenance", "DATA": "NAMA"}));
            })
            .await;

        let fetcher = HttpFeedFetcher::new(&config(server.url("/feed"))).unwrap();
        match fetcher.fetch().await.unwrap_err() {
            AppError::Upstream { code, message } => {
                assert_eq!(code, 200);
                assert_eq!(message, "maintenance");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_missing_data_is_empty_payload() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/feed");
                then.status(200).json_body(serde_json::json!({"RC": 200, "RCM": "OK"}));
            })
            .await;

        let fetcher = HttpFeedFetcher::new(&config(server.url("/feed"))).unwrap();
        assert_eq!(fetcher.fetch().await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_fetch_transport_failure() {
        // nothing listens on port 9 of the loopback interface
        let fetcher = HttpFeedFetcher::new(&config("http://127.0.0.1:9/feed".to_string())).unwrap();

        match fetcher.fetch().await.unwrap_err() {
            AppError::Fetch { detail } => assert!(!detail.is_empty()),
            other => panic!("expected fetch error, got {other:?}"),
        }
    }
}
