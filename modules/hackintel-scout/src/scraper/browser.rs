// Browser abstraction for the history scraper.
//
// A Browser opens sessions; a session renders one page per `goto` and must be
// closed by its owner. Backends: local Chromium (--dump-dom) and Browserless.
// Tests use `testing::MockBrowser`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use scraper::{Html, Selector};

use hackintel_common::{Config, PageBackend};

use super::browserless::BrowserlessBrowser;
use super::chrome::ChromeBrowser;

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Wait until `selector` matches at least one element, or fail after `timeout`.
#[derive(Debug, Clone, PartialEq)]
pub struct WaitFor {
    pub selector: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub url: String,
    pub navigation_timeout: Duration,
    pub wait_for: Option<WaitFor>,
}

impl PageRequest {
    pub fn new(url: &str, navigation_timeout: Duration) -> Self {
        Self {
            url: url.to_string(),
            navigation_timeout,
            wait_for: None,
        }
    }

    pub fn wait_for(mut self, selector: &str, timeout: Duration) -> Self {
        self.wait_for = Some(WaitFor {
            selector: selector.to_string(),
            timeout,
        });
        self
    }
}

/// Rendered DOM of one navigation step.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub url: String,
    pub html: String,
}

#[async_trait]
pub trait Browser: Send + Sync {
    async fn open_session(&self) -> Result<Box<dyn BrowserSession>>;
    fn name(&self) -> &str;
}

#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Navigate and return the settled DOM. Navigation errors, timeouts and
    /// unmet selector waits are all `Err`.
    async fn goto(&self, request: &PageRequest) -> Result<RenderedPage>;

    /// Release the session. Further `goto` calls fail.
    async fn close(&self) -> Result<()>;
}

/// Build the configured production browser.
pub fn browser_from_config(config: &Config) -> Result<Arc<dyn Browser>> {
    let browser: Arc<dyn Browser> = match &config.page_backend {
        PageBackend::Chrome { binary } => Arc::new(ChromeBrowser::new(binary)),
        PageBackend::Browserless { base_url, token } => Arc::new(BrowserlessBrowser::new(
            base_url,
            token.as_deref(),
            config.navigation_timeout,
            config.selector_timeout,
        )?),
    };
    Ok(browser)
}

/// Whether `selector` matches anything in `html`. Invalid selectors never match.
pub fn selector_present(html: &str, selector: &str) -> bool {
    let Ok(sel) = Selector::parse(selector) else {
        return false;
    };
    let document = Html::parse_document(html);
    let found = document.select(&sel).next().is_some();
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_present_matches_rendered_markup() {
        let html = r#"<html><body><div class="gallery-item winner"></div></body></html>"#;
        assert!(selector_present(html, ".software-entry, .gallery-item"));
        assert!(!selector_present(html, "article.winner"));
    }

    #[test]
    fn invalid_selector_never_matches() {
        assert!(!selector_present("<p>hi</p>", "p[["));
    }

    #[test]
    fn page_request_builder_sets_wait() {
        let req = PageRequest::new("https://x.devpost.com", Duration::from_secs(30))
            .wait_for(".gallery-item", Duration::from_secs(10));
        assert_eq!(
            req.wait_for,
            Some(WaitFor {
                selector: ".gallery-item".into(),
                timeout: Duration::from_secs(10),
            })
        );
    }
}
