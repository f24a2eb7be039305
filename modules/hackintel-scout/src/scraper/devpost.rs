// Devpost page shapes: organizer discovery, edition links and gallery cards.
//
// Everything here is synchronous and works on rendered HTML strings, so the
// parsed DOM never lives across an await point.

use std::collections::HashSet;

use anyhow::{Context, Result};
use regex::Regex;
use scraper::{ElementRef, Html};
use url::Url;

use hackintel_common::WinningProject;

use super::extract::{self, Chain};

/// Candidate organizer links, in priority order.
pub const ORGANIZER_SELECTORS: &[&str] = &[
    r#"a[href*="/organizations/"]"#,
    ".organizer a",
    "a.host-link",
    r#"[data-role="organizer"] a"#,
];

/// Path fragments of links on an organizer page that are not events.
pub const NON_EVENT_PATTERNS: &[&str] = &["/users/", "/software/", "/challenges"];

/// Any project card; waited on before reading a gallery.
pub const CARD_SELECTOR: &str = ".software-entry, .gallery-item";

/// Winner card shapes, tried in order.
pub const WINNER_CARD_SELECTORS: &[&str] = &[
    ".software-entry.winner",
    ".gallery-item.winner",
    "article.winner",
];

const TITLE_SELECTORS: &[&str] = &["h1", ".header-title", "#header h1"];
const PROJECT_LINK_SELECTORS: &[&str] = &[
    r#"a[href*="/software/"]"#,
    "h5 a",
    ".software-entry-name a",
];
const TAGLINE_SELECTORS: &[&str] = &[".tagline", ".software-tagline", "p"];
const PRIZE_SELECTORS: &[&str] = &[".winner-ribbon", ".prize-tag", r#"[class*="prize"]"#];
const TECHNOLOGY_SELECTOR: &str = r#".tag, .tech-tag, [class*="built-with"] li"#;

/// What one gallery page yielded.
#[derive(Debug, Clone, Default)]
pub struct GalleryExtraction {
    pub hackathon_name: String,
    pub winners: Vec<WinningProject>,
    pub cards_seen: u32,
    pub cards_skipped: u32,
}

/// Site-specific knowledge, parameterized by the site root (`https://devpost.com`).
pub struct DevpostSite {
    base: Url,
    host: String,
    organizer_re: Regex,
}

impl DevpostSite {
    pub fn new(site_base: &str) -> Result<Self> {
        let base = Url::parse(site_base).context("Invalid site base URL")?;
        let host = base
            .host_str()
            .map(|h| h.trim_start_matches("www.").to_string())
            .context("Site base URL has no host")?;
        let organizer_re = Regex::new(&format!(
            r"{}/organizations/([a-zA-Z0-9_-]+)",
            regex::escape(&host)
        ))
        .context("Failed to build organizer pattern")?;

        Ok(Self {
            base,
            host,
            organizer_re,
        })
    }

    /// Resolve a possibly-relative href against the site root.
    pub fn resolve(&self, href: &str) -> Option<String> {
        if href.starts_with("http://") || href.starts_with("https://") {
            return Some(href.to_string());
        }
        self.base.join(href).ok().map(|u| u.to_string())
    }

    /// Links to per-event subdomains such as `https://foo-2024.devpost.com`.
    pub fn edition_link_selector(&self) -> String {
        format!(r#"a[href*=".{}"]"#, self.host)
    }

    /// Organizer profile URL from a hackathon detail page, if discoverable.
    pub fn find_organizer(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);

        let mut chain = Chain::new("organizer");
        for css in ORGANIZER_SELECTORS {
            chain = chain.then(extract::attr(css, "href", |href| {
                href.contains("/organizations/")
            }));
        }
        let root = format!("{}://{}", self.base.scheme(), self.host);
        chain = chain.then(extract::markup(self.organizer_re.clone(), move |slug| {
            format!("{root}/organizations/{slug}")
        }));

        let found = chain.first(document.root_element());
        found.and_then(|href| self.resolve(&href))
    }

    /// Candidate past-edition URLs on an organizer page, in page order, deduplicated.
    pub fn collect_edition_links(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let Some(sel) = extract::selector(&self.edition_link_selector()) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for el in document.select(&sel) {
            let Some(href) = el.value().attr("href").map(str::trim) else {
                continue;
            };
            if href.is_empty() || NON_EVENT_PATTERNS.iter().any(|p| href.contains(p)) {
                continue;
            }
            let Some(url) = normalize_edition_url(href) else {
                continue;
            };
            if seen.insert(url.clone()) {
                links.push(url);
            }
        }

        links
    }

    /// Title and winner cards of a rendered project gallery.
    pub fn extract_gallery(&self, html: &str) -> GalleryExtraction {
        let document = Html::parse_document(html);
        let root = document.root_element();

        let mut title_chain = Chain::new("hackathon_name");
        for css in TITLE_SELECTORS {
            title_chain = title_chain.then(extract::text(css));
        }

        let mut out = GalleryExtraction {
            hackathon_name: title_chain.first_or_default(root),
            ..Default::default()
        };

        let mut seen_urls = HashSet::new();
        for css in WINNER_CARD_SELECTORS {
            let Some(sel) = extract::selector(css) else {
                continue;
            };
            for card in root.select(&sel) {
                out.cards_seen += 1;
                match self.extract_project(card) {
                    Some(project) => {
                        if seen_urls.insert(project.url.clone()) {
                            out.winners.push(project);
                        }
                    }
                    None => {
                        out.cards_skipped += 1;
                        tracing::debug!(selector = *css, "Skipping winner card without title link");
                    }
                }
            }
        }

        out
    }

    /// One winner card. `None` unless both a title and a project URL are present.
    pub fn extract_project(&self, card: ElementRef<'_>) -> Option<WinningProject> {
        let mut link_chain = Chain::new("project_link");
        for css in PROJECT_LINK_SELECTORS {
            link_chain = link_chain.then(extract::link(css));
        }
        let (title, href) = link_chain.first(card)?;
        let url = self.resolve(&href)?;

        let mut tagline = Chain::new("tagline");
        for css in TAGLINE_SELECTORS {
            tagline = tagline.then(extract::text(css));
        }
        let mut prize = Chain::new("prize");
        for css in PRIZE_SELECTORS {
            prize = prize.then(extract::text(css));
        }

        Some(WinningProject {
            title,
            url,
            tagline: tagline.first_or_default(card),
            prize: prize.first_or_default(card),
            technologies: extract::all_texts(card, TECHNOLOGY_SELECTOR),
            team_size: None,
        })
    }
}

/// Absolute, query-free form of an edition link used for dedup and navigation.
fn normalize_edition_url(href: &str) -> Option<String> {
    let absolute = if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if let Some(rest) = href.strip_prefix("//") {
        format!("https://{rest}")
    } else {
        format!("https://{href}")
    };

    let mut url = Url::parse(&absolute).ok()?;
    url.set_query(None);
    url.set_fragment(None);
    Some(url.to_string().trim_end_matches('/').to_string())
}

/// Submissions gallery of an edition.
pub fn gallery_url(edition_url: &str) -> String {
    let mut url = edition_url.to_string();
    if !url.ends_with('/') {
        url.push('/');
    }
    url.push_str("project-gallery");
    url
}

/// First `20xx` token in the edition name, then in its URL.
pub fn infer_year(hackathon_name: &str, url: &str) -> Option<String> {
    let re = Regex::new(r"20\d{2}").ok()?;
    re.find(&format!("{hackathon_name}{url}"))
        .map(|m| m.as_str().to_string())
}
