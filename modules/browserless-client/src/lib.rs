pub mod error;

pub use error::{BrowserlessError, Result};

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

/// Body of a Browserless `/content` request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRequest {
    pub url: String,
    pub goto_options: GotoOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_for_selector: Option<WaitForSelector>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GotoOptions {
    pub wait_until: String,
    /// Milliseconds.
    pub timeout: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WaitForSelector {
    pub selector: String,
    /// Milliseconds.
    pub timeout: u64,
}

impl ContentRequest {
    /// Navigate to `url` and consider it loaded once the network goes idle.
    pub fn new(url: &str, navigation_timeout: Duration) -> Self {
        Self {
            url: url.to_string(),
            goto_options: GotoOptions {
                wait_until: "networkidle2".to_string(),
                timeout: navigation_timeout.as_millis() as u64,
            },
            wait_for_selector: None,
        }
    }

    /// Fail the request unless `selector` matches something within `timeout`.
    pub fn wait_for(mut self, selector: &str, timeout: Duration) -> Self {
        self.wait_for_selector = Some(WaitForSelector {
            selector: selector.to_string(),
            timeout: timeout.as_millis() as u64,
        });
        self
    }
}

pub struct BrowserlessClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl BrowserlessClient {
    /// `request_timeout` bounds the whole HTTP exchange, so it should exceed
    /// the navigation and selector timeouts sent in each request.
    pub fn new(base_url: &str, token: Option<&str>, request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
        })
    }

    fn endpoint(&self) -> String {
        let mut endpoint = format!("{}/content", self.base_url);
        if let Some(ref token) = self.token {
            endpoint.push_str(&format!("?token={token}"));
        }
        endpoint
    }

    /// Fetch rendered HTML via the Browserless /content endpoint, with explicit
    /// navigation and selector waits.
    pub async fn content_with(&self, request: &ContentRequest) -> Result<String> {
        debug!(
            url = request.url.as_str(),
            wait_for = request.wait_for_selector.as_ref().map(|w| w.selector.as_str()),
            "Browserless content request"
        );

        let resp = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(BrowserlessError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_request_serializes_camel_case() {
        let req = ContentRequest::new("https://example.devpost.com", Duration::from_secs(30))
            .wait_for(".gallery-item", Duration::from_secs(10));
        let body = serde_json::to_value(&req).unwrap();

        assert_eq!(body["url"], "https://example.devpost.com");
        assert_eq!(body["gotoOptions"]["waitUntil"], "networkidle2");
        assert_eq!(body["gotoOptions"]["timeout"], 30000);
        assert_eq!(body["waitForSelector"]["selector"], ".gallery-item");
        assert_eq!(body["waitForSelector"]["timeout"], 10000);
    }

    #[test]
    fn wait_for_selector_omitted_when_unset() {
        let req = ContentRequest::new("https://devpost.com", Duration::from_secs(5));
        let body = serde_json::to_value(&req).unwrap();
        assert!(body.get("waitForSelector").is_none());
    }

    #[test]
    fn endpoint_appends_token_and_trims_slash() {
        let client =
            BrowserlessClient::new("http://localhost:3000/", Some("abc"), Duration::from_secs(1))
                .unwrap();
        assert_eq!(client.endpoint(), "http://localhost:3000/content?token=abc");

        let anon = BrowserlessClient::new("http://localhost:3000", None, Duration::from_secs(1))
            .unwrap();
        assert_eq!(anon.endpoint(), "http://localhost:3000/content");
    }

    #[test]
    fn api_408_counts_as_timeout() {
        let err = BrowserlessError::Api {
            status: 408,
            message: "waitForSelector timed out".into(),
        };
        assert!(err.is_timeout());
        assert!(!BrowserlessError::Network("refused".into()).is_timeout());
    }
}
