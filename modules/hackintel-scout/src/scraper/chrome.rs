use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tempfile::TempDir;
use tracing::{debug, info};

use super::browser::{selector_present, Browser, BrowserSession, PageRequest, RenderedPage, USER_AGENT};

/// Virtual time granted to page scripts when the request has no selector wait.
const DEFAULT_SETTLE_BUDGET: Duration = Duration::from_secs(5);

/// Headless Chromium via `--dump-dom`. Each session gets its own profile
/// directory, removed on `close()` or when the session is dropped.
pub struct ChromeBrowser {
    binary: String,
}

impl ChromeBrowser {
    pub fn new(binary: &str) -> Self {
        info!(binary, "Using ChromeBrowser (dump-dom)");
        Self {
            binary: binary.to_string(),
        }
    }
}

#[async_trait]
impl Browser for ChromeBrowser {
    async fn open_session(&self) -> Result<Box<dyn BrowserSession>> {
        let profile = tempfile::tempdir().context("Failed to create temp profile dir")?;
        debug!(profile = %profile.path().display(), "Chrome session opened");
        Ok(Box::new(ChromeSession {
            binary: self.binary.clone(),
            profile: Mutex::new(Some(profile)),
            pages: AtomicU32::new(0),
        }))
    }

    fn name(&self) -> &str {
        "chrome"
    }
}

struct ChromeSession {
    binary: String,
    profile: Mutex<Option<TempDir>>,
    pages: AtomicU32,
}

impl ChromeSession {
    fn profile_path(&self) -> Result<PathBuf> {
        let guard = self
            .profile
            .lock()
            .map_err(|_| anyhow::anyhow!("Chrome profile lock poisoned"))?;
        guard
            .as_ref()
            .map(|dir| dir.path().to_path_buf())
            .ok_or_else(|| anyhow::anyhow!("Chrome session already closed"))
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn goto(&self, request: &PageRequest) -> Result<RenderedPage> {
        let url = request.url.as_str();
        let parsed = url::Url::parse(url).context("Invalid URL")?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            anyhow::bail!("Only http/https URLs are allowed, got: {}", parsed.scheme());
        }

        let profile = self.profile_path()?;
        let budget = request
            .wait_for
            .as_ref()
            .map(|w| w.timeout)
            .unwrap_or(DEFAULT_SETTLE_BUDGET);

        let mut command = tokio::process::Command::new(&self.binary);
        command
            .args(["--headless", "--no-sandbox", "--disable-gpu", "--disable-dev-shm-usage"])
            .arg(format!("--user-data-dir={}", profile.display()))
            .arg(format!("--user-agent={USER_AGENT}"))
            .arg(format!("--virtual-time-budget={}", budget.as_millis()))
            .arg("--dump-dom")
            .arg(url)
            .kill_on_drop(true);

        let result = tokio::time::timeout(request.navigation_timeout + budget, command.output()).await;

        let output = match result {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(e).with_context(|| format!("Failed to run Chrome for {url}")),
            Err(_) => anyhow::bail!(
                "Chrome timed out after {}s for {url}",
                (request.navigation_timeout + budget).as_secs()
            ),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Chrome exited with {} for {url}: {}", output.status, stderr.trim());
        }

        let html = String::from_utf8_lossy(&output.stdout).into_owned();
        if html.trim().is_empty() {
            anyhow::bail!("Chrome returned an empty DOM for {url}");
        }

        // --dump-dom cannot block on a selector, so check the settled DOM instead.
        if let Some(wait) = &request.wait_for {
            if !selector_present(&html, &wait.selector) {
                anyhow::bail!(
                    "Timed out waiting for selector {:?} on {url}",
                    wait.selector
                );
            }
        }

        self.pages.fetch_add(1, Ordering::Relaxed);
        debug!(url, bytes = html.len(), "Chrome page rendered");

        Ok(RenderedPage {
            url: url.to_string(),
            html,
        })
    }

    async fn close(&self) -> Result<()> {
        let profile = self
            .profile
            .lock()
            .map_err(|_| anyhow::anyhow!("Chrome profile lock poisoned"))?
            .take();
        if let Some(dir) = profile {
            dir.close().context("Failed to remove Chrome profile dir")?;
        }
        debug!(pages = self.pages.load(Ordering::Relaxed), "Chrome session closed");
        Ok(())
    }
}
