// Test mocks and fixtures for the history scraper and the aggregator.
//
// - MockBrowser (Browser): HashMap-based URL→rendered HTML, records visits
//   and session lifecycle
// - HTML builders for hackathon, organizer and gallery pages
// - Dataset builders for aggregator tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;

use hackintel_common::{HackathonEdition, HistoricalDataset, WinningProject};

use crate::scraper::browser::{selector_present, Browser, BrowserSession, PageRequest, RenderedPage};
use crate::scraper::ScraperConfig;

pub const SITE: &str = "https://devpost.com";

/// Scraper settings with no pacing delay and short timeouts.
pub fn test_scraper_config() -> ScraperConfig {
    ScraperConfig {
        site_base: SITE.to_string(),
        navigation_timeout: Duration::from_secs(1),
        selector_timeout: Duration::from_secs(1),
        edition_delay: Duration::ZERO,
    }
}

// ---------------------------------------------------------------------------
// MockBrowser
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MockState {
    opened: AtomicU32,
    closed: AtomicU32,
    visited: Mutex<Vec<String>>,
}

/// Serves registered HTML by exact URL. `goto` fails for unregistered URLs
/// and when a requested selector is absent from the page.
/// Builder pattern: `.on_page()`, `.failing_open()`.
#[derive(Default)]
pub struct MockBrowser {
    pages: HashMap<String, String>,
    fail_open: bool,
    state: Arc<MockState>,
}

impl MockBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    /// Every `open_session` call fails.
    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn sessions_opened(&self) -> u32 {
        self.state.opened.load(Ordering::SeqCst)
    }

    pub fn sessions_closed(&self) -> u32 {
        self.state.closed.load(Ordering::SeqCst)
    }

    /// URLs successfully rendered, in order.
    pub fn visited(&self) -> Vec<String> {
        self.state.visited.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Browser for MockBrowser {
    async fn open_session(&self) -> Result<Box<dyn BrowserSession>> {
        if self.fail_open {
            bail!("MockBrowser: session refused");
        }
        self.state.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockSession {
            pages: self.pages.clone(),
            state: self.state.clone(),
            closed: AtomicBool::new(false),
        }))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

struct MockSession {
    pages: HashMap<String, String>,
    state: Arc<MockState>,
    closed: AtomicBool,
}

#[async_trait]
impl BrowserSession for MockSession {
    async fn goto(&self, request: &PageRequest) -> Result<RenderedPage> {
        if self.closed.load(Ordering::SeqCst) {
            bail!("MockBrowser: session already closed");
        }
        let Some(html) = self.pages.get(&request.url) else {
            bail!("MockBrowser: no page registered for {}", request.url);
        };
        if let Some(wait) = &request.wait_for {
            if !selector_present(html, &wait.selector) {
                bail!("MockBrowser: timed out waiting for {}", wait.selector);
            }
        }
        if let Ok(mut visited) = self.state.visited.lock() {
            visited.push(request.url.clone());
        }
        Ok(RenderedPage {
            url: request.url.clone(),
            html: html.clone(),
        })
    }

    async fn close(&self) -> Result<()> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.state.closed.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// HTML fixtures
// ---------------------------------------------------------------------------

/// A hackathon overview page, linking its organizer when `organizer_slug` is set.
pub fn hackathon_page(name: &str, organizer_slug: Option<&str>) -> String {
    let organizer = organizer_slug
        .map(|slug| {
            format!(r#"<div class="organizer"><a href="/organizations/{slug}">Host</a></div>"#)
        })
        .unwrap_or_default();
    format!(
        r#"<html><head><title>{name}</title></head><body>
<h1>{name}</h1>
{organizer}
<a href="/about">About</a>
</body></html>"#
    )
}

/// An organizer profile listing the given edition URLs (plus non-event noise).
pub fn organizer_page(edition_urls: &[&str]) -> String {
    let links: String = edition_urls
        .iter()
        .map(|u| format!(r#"<a class="challenge-link" href="{u}">edition</a>"#))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        r#"<html><body>
<a href="{SITE}/users/someone">member</a>
{links}
</body></html>"#
    )
}

/// A rendered project gallery with the given cards.
pub fn gallery_page(title: &str, cards: &[String]) -> String {
    format!(
        r#"<html><body>
<h1>{title}</h1>
<div class="gallery">
{}
</div>
</body></html>"#,
        cards.join("\n")
    )
}

pub fn winner_card(title: &str, slug: &str, tagline: &str, prize: &str, techs: &[&str]) -> String {
    let items: String = techs.iter().map(|t| format!("<li>{t}</li>")).collect();
    format!(
        r#"<div class="gallery-item winner">
  <h5><a href="/software/{slug}">{title}</a></h5>
  <p class="tagline">{tagline}</p>
  <aside class="winner-ribbon">{prize}</aside>
  <ul class="built-with">{items}</ul>
</div>"#
    )
}

/// A winner card without a project link; extraction skips it.
pub fn malformed_card() -> String {
    r#"<div class="gallery-item winner"><p class="tagline">Nothing to click</p></div>"#.to_string()
}

/// A gallery card that did not win.
pub fn plain_card(title: &str, slug: &str) -> String {
    format!(r#"<div class="gallery-item"><h5><a href="/software/{slug}">{title}</a></h5></div>"#)
}

// ---------------------------------------------------------------------------
// Dataset builders
// ---------------------------------------------------------------------------

pub fn project(title: &str, prize: &str, techs: &[&str]) -> WinningProject {
    let slug = title.to_lowercase().replace(' ', "-");
    WinningProject {
        title: title.to_string(),
        url: format!("{SITE}/software/{slug}"),
        tagline: String::new(),
        prize: prize.to_string(),
        technologies: techs.iter().map(|t| t.to_string()).collect(),
        team_size: None,
    }
}

pub fn edition(name: &str, year: Option<&str>, winners: Vec<WinningProject>) -> HackathonEdition {
    let slug = name.to_lowercase().replace(' ', "-");
    let url = format!("https://{slug}.devpost.com");
    HackathonEdition {
        gallery_url: format!("{url}/project-gallery"),
        hackathon_url: url,
        hackathon_name: name.to_string(),
        year: year.map(str::to_string),
        winners,
    }
}

pub fn dataset(editions: Vec<HackathonEdition>) -> HistoricalDataset {
    let mut ds = HistoricalDataset::new("https://current.devpost.com");
    ds.organizer_url = Some(format!("{SITE}/organizations/current"));
    ds.past_hackathons = editions;
    ds
}
