//! Historical scraper: hackathon page → organizer → past editions → winners.
//!
//! The scraper owns one browser session per run and drives it strictly
//! sequentially. Every navigation or extraction failure degrades the affected
//! unit to "nothing found"; [`HistoryScraper::scrape_history`] never fails.

pub mod browser;
pub mod browserless;
pub mod chrome;
pub mod devpost;
pub mod extract;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use hackintel_common::{Config, HackathonEdition, HistoricalDataset, DEFAULT_SITE_BASE};

pub use browser::{
    browser_from_config, selector_present, Browser, BrowserSession, PageRequest, RenderedPage,
};
use devpost::{gallery_url, infer_year, DevpostSite, CARD_SELECTOR};

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub site_base: String,
    pub navigation_timeout: Duration,
    pub selector_timeout: Duration,
    /// Pause between consecutive edition scrapes.
    pub edition_delay: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            site_base: DEFAULT_SITE_BASE.to_string(),
            navigation_timeout: Duration::from_secs(30),
            selector_timeout: Duration::from_secs(10),
            edition_delay: Duration::from_secs(2),
        }
    }
}

impl From<&Config> for ScraperConfig {
    fn from(config: &Config) -> Self {
        Self {
            site_base: config.site_base.clone(),
            navigation_timeout: config.navigation_timeout,
            selector_timeout: config.selector_timeout,
            edition_delay: config.edition_delay,
        }
    }
}

/// Tally of one scrape run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ScrapeStats {
    pub pages_loaded: u32,
    pub pages_failed: u32,
    pub editions_found: u32,
    pub galleries_empty: u32,
    pub cards_seen: u32,
    pub cards_skipped: u32,
    pub winners_kept: u32,
}

impl std::fmt::Display for ScrapeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== History Scrape Complete ===")?;
        writeln!(f, "Pages loaded:    {}", self.pages_loaded)?;
        writeln!(f, "Pages failed:    {}", self.pages_failed)?;
        writeln!(f, "Editions found:  {}", self.editions_found)?;
        writeln!(f, "Empty galleries: {}", self.galleries_empty)?;
        writeln!(f, "Winner cards:    {}", self.cards_seen)?;
        writeln!(f, "Cards skipped:   {}", self.cards_skipped)?;
        write!(f, "Winners kept:    {}", self.winners_kept)
    }
}

/// Terminal state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeOutcome {
    Completed { editions: usize },
    NoOrganizer,
    SessionUnavailable,
}

pub struct HistoryScraper {
    browser: Arc<dyn Browser>,
    site: DevpostSite,
    config: ScraperConfig,
}

impl HistoryScraper {
    pub fn new(browser: Arc<dyn Browser>, config: ScraperConfig) -> Result<Self> {
        let site = DevpostSite::new(&config.site_base)?;
        Ok(Self {
            browser,
            site,
            config,
        })
    }

    /// Scrape up to `max_past_editions` past editions of the hackathon at `url`.
    pub async fn scrape_history(&self, url: &str, max_past_editions: usize) -> HistoricalDataset {
        let (dataset, outcome, stats) = self.scrape_history_with_stats(url, max_past_editions).await;
        info!(url, ?outcome, "History scrape finished.{stats}");
        dataset
    }

    /// Like [`HistoryScraper::scrape_history`], also reporting how the run ended.
    pub async fn scrape_history_with_stats(
        &self,
        url: &str,
        max_past_editions: usize,
    ) -> (HistoricalDataset, ScrapeOutcome, ScrapeStats) {
        let mut dataset = HistoricalDataset::new(url);
        let mut stats = ScrapeStats::default();

        let session = match self.browser.open_session().await {
            Ok(session) => session,
            Err(e) => {
                warn!(url, browser = self.browser.name(), error = %e, "Failed to open browser session");
                return (dataset, ScrapeOutcome::SessionUnavailable, stats);
            }
        };

        let outcome = self
            .drive(session.as_ref(), url, max_past_editions, &mut dataset, &mut stats)
            .await;

        if let Err(e) = session.close().await {
            warn!(url, error = %e, "Failed to close browser session");
        }

        (dataset, outcome, stats)
    }

    async fn drive(
        &self,
        session: &dyn BrowserSession,
        url: &str,
        max_past_editions: usize,
        dataset: &mut HistoricalDataset,
        stats: &mut ScrapeStats,
    ) -> ScrapeOutcome {
        let Some(organizer_url) = self.locate_organizer(session, url, stats).await else {
            warn!(url, "Could not find organizer profile");
            return ScrapeOutcome::NoOrganizer;
        };
        dataset.organizer_url = Some(organizer_url.clone());

        if max_past_editions == 0 {
            return ScrapeOutcome::Completed { editions: 0 };
        }

        let mut edition_urls = self.enumerate_editions(session, &organizer_url, stats).await;
        edition_urls.truncate(max_past_editions);

        for (i, edition_url) in edition_urls.iter().enumerate() {
            if i > 0 && !self.config.edition_delay.is_zero() {
                tokio::time::sleep(self.config.edition_delay).await;
            }
            info!(url = edition_url.as_str(), index = i + 1, total = edition_urls.len(), "Processing edition");
            let edition = self.scrape_edition(session, edition_url, stats).await;
            dataset.past_hackathons.push(edition);
        }

        ScrapeOutcome::Completed {
            editions: dataset.past_hackathons.len(),
        }
    }

    async fn locate_organizer(
        &self,
        session: &dyn BrowserSession,
        url: &str,
        stats: &mut ScrapeStats,
    ) -> Option<String> {
        info!(url, "Visiting hackathon page");
        let request = PageRequest::new(url, self.config.navigation_timeout);
        let page = match session.goto(&request).await {
            Ok(page) => page,
            Err(e) => {
                warn!(url, error = %e, "Failed to load hackathon page");
                stats.pages_failed += 1;
                return None;
            }
        };
        stats.pages_loaded += 1;

        let organizer = self.site.find_organizer(&page.html);
        if let Some(ref org) = organizer {
            info!(url, organizer = org.as_str(), "Found organizer");
        }
        organizer
    }

    async fn enumerate_editions(
        &self,
        session: &dyn BrowserSession,
        organizer_url: &str,
        stats: &mut ScrapeStats,
    ) -> Vec<String> {
        info!(organizer = organizer_url, "Fetching past hackathons");
        let request = PageRequest::new(organizer_url, self.config.navigation_timeout)
            .wait_for(&self.site.edition_link_selector(), self.config.selector_timeout);

        let page = match session.goto(&request).await {
            Ok(page) => page,
            Err(e) => {
                warn!(organizer = organizer_url, error = %e, "Failed to load organizer editions");
                stats.pages_failed += 1;
                return Vec::new();
            }
        };
        stats.pages_loaded += 1;

        let links = self.site.collect_edition_links(&page.html);
        stats.editions_found = links.len() as u32;
        info!(organizer = organizer_url, count = links.len(), "Found past hackathons");
        links
    }

    async fn scrape_edition(
        &self,
        session: &dyn BrowserSession,
        edition_url: &str,
        stats: &mut ScrapeStats,
    ) -> HackathonEdition {
        let gallery = gallery_url(edition_url);
        let mut edition = HackathonEdition::empty(edition_url, &gallery);

        info!(gallery = gallery.as_str(), "Scraping winners");
        let request = PageRequest::new(&gallery, self.config.navigation_timeout);

        let page = match session.goto(&request).await {
            Ok(page) => page,
            Err(e) => {
                warn!(gallery = gallery.as_str(), error = %e, "Failed to load project gallery");
                stats.pages_failed += 1;
                edition.year = infer_year("", edition_url);
                return edition;
            }
        };
        stats.pages_loaded += 1;

        let extraction = self.site.extract_gallery(&page.html);
        edition.year = infer_year(&extraction.hackathon_name, edition_url);
        edition.hackathon_name = extraction.hackathon_name;

        if !selector_present(&page.html, CARD_SELECTOR) {
            warn!(gallery = gallery.as_str(), "No project cards rendered");
            stats.galleries_empty += 1;
            return edition;
        }

        stats.cards_seen += extraction.cards_seen;
        stats.cards_skipped += extraction.cards_skipped;
        stats.winners_kept += extraction.winners.len() as u32;
        edition.winners = extraction.winners;

        info!(
            gallery = gallery.as_str(),
            winners = edition.winners.len(),
            skipped = extraction.cards_skipped,
            "Found winners"
        );
        edition
    }
}
