use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

use crate::error::{HackIntelError, Result};

pub const DEFAULT_SITE_BASE: &str = "https://devpost.com";

/// Which headless browser renders pages.
#[derive(Debug, Clone, PartialEq)]
pub enum PageBackend {
    /// Local Chromium binary driven with `--dump-dom`.
    Chrome { binary: String },
    /// Remote Browserless instance.
    Browserless {
        base_url: String,
        token: Option<String>,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Browser
    pub page_backend: PageBackend,
    pub site_base: String,
    pub navigation_timeout: Duration,
    pub selector_timeout: Duration,
    pub edition_delay: Duration,

    // Pipeline
    pub reports_dir: PathBuf,
    pub max_past_editions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_backend: PageBackend::Chrome {
                binary: "chromium".to_string(),
            },
            site_base: DEFAULT_SITE_BASE.to_string(),
            navigation_timeout: Duration::from_secs(30),
            selector_timeout: Duration::from_secs(10),
            edition_delay: Duration::from_secs(2),
            reports_dir: PathBuf::from("intelligence_reports"),
            max_past_editions: 3,
        }
    }
}

impl Config {
    /// Load configuration from environment variables. Everything has a default;
    /// only malformed numeric values are rejected.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let page_backend = match lookup("BROWSERLESS_URL").filter(|v| !v.is_empty()) {
            Some(base_url) => PageBackend::Browserless {
                base_url,
                token: lookup("BROWSERLESS_TOKEN").filter(|v| !v.is_empty()),
            },
            None => PageBackend::Chrome {
                binary: lookup("CHROME_BIN").unwrap_or_else(|| "chromium".to_string()),
            },
        };

        Ok(Self {
            page_backend,
            site_base: lookup("HACKINTEL_SITE_BASE")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.site_base),
            navigation_timeout: secs_var(&lookup, "NAVIGATION_TIMEOUT_SECS")?
                .unwrap_or(defaults.navigation_timeout),
            selector_timeout: secs_var(&lookup, "SELECTOR_TIMEOUT_SECS")?
                .unwrap_or(defaults.selector_timeout),
            edition_delay: secs_var(&lookup, "EDITION_DELAY_SECS")?
                .unwrap_or(defaults.edition_delay),
            reports_dir: lookup("REPORTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.reports_dir),
            max_past_editions: parse_var(&lookup, "MAX_PAST_EDITIONS")?
                .unwrap_or(defaults.max_past_editions),
        })
    }

    /// Log the effective configuration without secrets.
    pub fn log_redacted(&self) {
        let backend = match &self.page_backend {
            PageBackend::Chrome { binary } => format!("chrome ({binary})"),
            PageBackend::Browserless { base_url, token } => format!(
                "browserless ({base_url}, token {})",
                if token.is_some() { "set" } else { "unset" }
            ),
        };
        info!(
            backend = backend.as_str(),
            site_base = self.site_base.as_str(),
            navigation_timeout_secs = self.navigation_timeout.as_secs(),
            selector_timeout_secs = self.selector_timeout.as_secs(),
            edition_delay_secs = self.edition_delay.as_secs(),
            reports_dir = %self.reports_dir.display(),
            max_past_editions = self.max_past_editions,
            "Config loaded"
        );
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| HackIntelError::Config(format!("{key} must be a number, got {raw:?}"))),
    }
}

fn secs_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<Duration>> {
    Ok(parse_var::<u64>(lookup, key)?.map(Duration::from_secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_use_chrome_and_devpost() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(
            config.page_backend,
            PageBackend::Chrome {
                binary: "chromium".into()
            }
        );
        assert_eq!(config.site_base, "https://devpost.com");
        assert_eq!(config.max_past_editions, 3);
        assert_eq!(config.edition_delay, Duration::from_secs(2));
    }

    #[test]
    fn browserless_url_selects_browserless_backend() {
        let config = Config::from_lookup(lookup(&[
            ("BROWSERLESS_URL", "http://browserless:3000"),
            ("BROWSERLESS_TOKEN", "secret"),
            ("EDITION_DELAY_SECS", "0"),
        ]))
        .unwrap();
        assert_eq!(
            config.page_backend,
            PageBackend::Browserless {
                base_url: "http://browserless:3000".into(),
                token: Some("secret".into()),
            }
        );
        assert_eq!(config.edition_delay, Duration::ZERO);
    }

    #[test]
    fn malformed_number_is_config_error() {
        let err = Config::from_lookup(lookup(&[("MAX_PAST_EDITIONS", "many")])).unwrap_err();
        assert!(matches!(err, HackIntelError::Config(_)));
        assert!(err.to_string().contains("MAX_PAST_EDITIONS"));
    }
}
