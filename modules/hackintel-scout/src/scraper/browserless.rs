use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use browserless_client::{BrowserlessClient, ContentRequest};
use tracing::{debug, info};

use super::browser::{Browser, BrowserSession, PageRequest, RenderedPage};

/// Headroom on top of the navigation + selector budget for the HTTP exchange itself.
const REQUEST_SLACK: Duration = Duration::from_secs(15);

/// Remote rendering through Browserless `/content`. Sessions share one HTTP
/// client; Browserless waits for network idle and for the requested selector.
pub struct BrowserlessBrowser {
    client: Arc<BrowserlessClient>,
}

impl BrowserlessBrowser {
    pub fn new(
        base_url: &str,
        token: Option<&str>,
        navigation_timeout: Duration,
        selector_timeout: Duration,
    ) -> Result<Self> {
        info!(base_url, "Using BrowserlessBrowser");
        let client = BrowserlessClient::new(
            base_url,
            token,
            navigation_timeout + selector_timeout + REQUEST_SLACK,
        )
        .context("Failed to build Browserless client")?;
        Ok(Self {
            client: Arc::new(client),
        })
    }
}

#[async_trait]
impl Browser for BrowserlessBrowser {
    async fn open_session(&self) -> Result<Box<dyn BrowserSession>> {
        Ok(Box::new(BrowserlessSession {
            client: self.client.clone(),
            closed: AtomicBool::new(false),
            pages: AtomicU32::new(0),
        }))
    }

    fn name(&self) -> &str {
        "browserless"
    }
}

struct BrowserlessSession {
    client: Arc<BrowserlessClient>,
    closed: AtomicBool,
    pages: AtomicU32,
}

#[async_trait]
impl BrowserSession for BrowserlessSession {
    async fn goto(&self, request: &PageRequest) -> Result<RenderedPage> {
        if self.closed.load(Ordering::Acquire) {
            anyhow::bail!("Browserless session already closed");
        }

        let mut content = ContentRequest::new(&request.url, request.navigation_timeout);
        if let Some(wait) = &request.wait_for {
            content = content.wait_for(&wait.selector, wait.timeout);
        }

        let html = self
            .client
            .content_with(&content)
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow::anyhow!("Browserless timed out on {}: {e}", request.url)
                } else {
                    anyhow::anyhow!("Browserless content request failed for {}: {e}", request.url)
                }
            })?;

        if html.trim().is_empty() {
            anyhow::bail!("Browserless returned empty HTML for {}", request.url);
        }

        self.pages.fetch_add(1, Ordering::Relaxed);
        debug!(url = request.url.as_str(), bytes = html.len(), "Browserless page rendered");

        Ok(RenderedPage {
            url: request.url.clone(),
            html,
        })
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        debug!(pages = self.pages.load(Ordering::Relaxed), "Browserless session closed");
        Ok(())
    }
}
