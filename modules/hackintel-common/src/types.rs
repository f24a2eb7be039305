use serde::{Deserialize, Deserializer, Serialize};

/// Platform label recorded on datasets scraped by the default flow.
pub const DEFAULT_PLATFORM: &str = "devpost";

// --- Scraped records ---

/// A single winning submission within one edition.
///
/// Only `title` and `url` are guaranteed by the scraper; every other field
/// falls back to an empty value, including when loaded from a raw JSON file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WinningProject {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub prize: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    /// Not populated by gallery scraping; sources that know it may set it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_size: Option<f64>,
}

/// One past occurrence of a recurring hackathon.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HackathonEdition {
    #[serde(default)]
    pub hackathon_url: String,
    #[serde(default)]
    pub gallery_url: String,
    #[serde(default)]
    pub hackathon_name: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub year: Option<String>,
    #[serde(default)]
    pub winners: Vec<WinningProject>,
}

impl HackathonEdition {
    /// An edition record with no winners, used when a gallery could not be read.
    pub fn empty(hackathon_url: &str, gallery_url: &str) -> Self {
        Self {
            hackathon_url: hackathon_url.to_string(),
            gallery_url: gallery_url.to_string(),
            ..Default::default()
        }
    }
}

/// Everything the scraper learned about one hackathon's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalDataset {
    #[serde(default)]
    pub input_url: String,
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default)]
    pub organizer_url: Option<String>,
    pub past_hackathons: Vec<HackathonEdition>,
}

impl HistoricalDataset {
    pub fn new(input_url: &str) -> Self {
        Self {
            input_url: input_url.to_string(),
            platform: DEFAULT_PLATFORM.to_string(),
            organizer_url: None,
            past_hackathons: Vec::new(),
        }
    }

    pub fn total_winners(&self) -> usize {
        self.past_hackathons.iter().map(|e| e.winners.len()).sum()
    }
}

fn default_platform() -> String {
    DEFAULT_PLATFORM.to_string()
}

/// Older dumps write a missing year as `""`.
fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}
