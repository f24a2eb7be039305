//! Aggregation of a scraped history into an [`IntelligenceReport`].
//!
//! Everything in this module is synchronous and deterministic: the same
//! dataset always yields the same report, field for field.

pub mod prizes;
pub mod render;
pub mod report;
pub mod themes;

use std::collections::{HashMap, HashSet};

use tracing::debug;

use hackintel_common::{HackIntelError, HistoricalDataset, Result, WinningProject};

pub use prizes::PrizeTier;
pub use report::*;

const ALL_TECHNOLOGIES_LIMIT: usize = 20;
const TOP_TECHNOLOGIES_LIMIT: usize = 10;
const TOP_THEMES_LIMIT: usize = 5;

/// A winner flattened out of its edition.
#[derive(Debug, Clone)]
pub struct TaggedWinner<'a> {
    pub project: &'a WinningProject,
    pub hackathon_name: &'a str,
    pub hackathon_year: Option<&'a str>,
}

pub struct HackathonIntelligence {
    dataset: HistoricalDataset,
}

impl HackathonIntelligence {
    pub fn new(dataset: HistoricalDataset) -> Self {
        Self { dataset }
    }

    /// Load from an untyped document, e.g. a dataset file written by an earlier run.
    pub fn from_value(raw: serde_json::Value) -> Result<Self> {
        let Some(obj) = raw.as_object() else {
            return Err(HackIntelError::MalformedDataset(
                "dataset must be a JSON object".to_string(),
            ));
        };
        if !obj.contains_key("past_hackathons") {
            return Err(HackIntelError::MalformedDataset(
                "missing `past_hackathons`".to_string(),
            ));
        }
        let dataset = serde_json::from_value(raw)
            .map_err(|e| HackIntelError::MalformedDataset(e.to_string()))?;
        Ok(Self::new(dataset))
    }

    pub fn dataset(&self) -> &HistoricalDataset {
        &self.dataset
    }

    /// Winners across editions in order. A project URL repeated within one
    /// edition is counted once.
    pub fn winners(&self) -> Vec<TaggedWinner<'_>> {
        let mut out = Vec::new();
        for edition in &self.dataset.past_hackathons {
            let mut seen = HashSet::new();
            for project in &edition.winners {
                if !project.url.is_empty() && !seen.insert(project.url.as_str()) {
                    debug!(url = project.url.as_str(), "Dropping duplicate winner");
                    continue;
                }
                out.push(TaggedWinner {
                    project,
                    hackathon_name: &edition.hackathon_name,
                    hackathon_year: edition.year.as_deref(),
                });
            }
        }
        out
    }

    pub fn analyze(&self) -> IntelligenceReport {
        let winners = self.winners();
        let tech_stack_analysis = analyze_tech_stack(&winners);
        let winning_themes = analyze_themes(&winners);
        let actionable_insights = insights(&tech_stack_analysis, &winning_themes);

        IntelligenceReport {
            summary: ReportSummary {
                total_past_editions: self.dataset.past_hackathons.len(),
                total_winners_analyzed: winners.len(),
                platform: self.dataset.platform.clone(),
                organizer: self
                    .dataset
                    .organizer_url
                    .clone()
                    .unwrap_or_else(|| "N/A".to_string()),
            },
            tech_stack_analysis,
            team_size_trends: analyze_team_size(&winners),
            winning_themes,
            prize_distribution: analyze_prizes(&winners),
            actionable_insights,
        }
    }
}

fn analyze_tech_stack(winners: &[TaggedWinner<'_>]) -> TechStackAnalysis {
    // First-seen order doubles as the tie-break for the stable sort below.
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for w in winners {
        for tech in &w.project.technologies {
            let key = tech.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            let count = counts.entry(key.clone()).or_insert(0);
            if *count == 0 {
                order.push(key);
            }
            *count += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|key| {
            let count = counts.get(&key).copied().unwrap_or(0);
            (key, count)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(ALL_TECHNOLOGIES_LIMIT);

    let all_technologies: Vec<TechnologyStat> = ranked
        .into_iter()
        .map(|(key, count)| TechnologyStat {
            technology: display_name(&key),
            count,
            percentage: percentage(count, winners.len()),
        })
        .collect();

    TechStackAnalysis {
        top_technologies: all_technologies
            .iter()
            .take(TOP_TECHNOLOGIES_LIMIT)
            .cloned()
            .collect(),
        all_technologies,
    }
}

fn analyze_team_size(winners: &[TaggedWinner<'_>]) -> TeamSizeTrends {
    let sizes: Vec<f64> = winners
        .iter()
        .filter_map(|w| w.project.team_size)
        .filter(|size| *size > 0.0)
        .collect();

    if sizes.is_empty() {
        return TeamSizeTrends::unavailable();
    }

    let average = round1(sizes.iter().sum::<f64>() / sizes.len() as f64);
    TeamSizeTrends {
        data_available: true,
        average_team_size: Some(average),
        median_team_size: Some(median(sizes)),
        recommendation: Some(format!("Winning teams average {average:.1} members")),
        message: None,
    }
}

fn analyze_themes(winners: &[TaggedWinner<'_>]) -> ThemeAnalysis {
    let texts: Vec<String> = winners
        .iter()
        .map(|w| format!("{} {}", w.project.title, w.project.tagline).to_lowercase())
        .collect();

    let mut ranked: Vec<ThemeStat> = themes::THEME_KEYWORDS
        .iter()
        .filter_map(|(theme, keywords)| {
            let mentions: usize = texts.iter().map(|t| themes::mentions(t, keywords)).sum();
            (mentions > 0).then(|| ThemeStat {
                theme: theme.to_string(),
                mentions,
                percentage: percentage(mentions, winners.len()),
            })
        })
        .collect();
    ranked.sort_by(|a, b| b.mentions.cmp(&a.mentions));

    ThemeAnalysis {
        top_themes: ranked.iter().take(TOP_THEMES_LIMIT).cloned().collect(),
        all_themes: ranked,
    }
}

fn analyze_prizes(winners: &[TaggedWinner<'_>]) -> PrizeDistribution {
    let mut counts: HashMap<PrizeTier, usize> = HashMap::new();
    for tier in winners.iter().filter_map(|w| PrizeTier::classify(&w.project.prize)) {
        *counts.entry(tier).or_insert(0) += 1;
    }

    PrizeDistribution {
        prize_breakdown: PrizeTier::ALL
            .into_iter()
            .map(|tier| PrizeTierCount {
                tier,
                count: counts.get(&tier).copied().unwrap_or(0),
            })
            .collect(),
        total_prizes_awarded: counts.values().sum(),
    }
}

fn insights(tech: &TechStackAnalysis, themes: &ThemeAnalysis) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(top) = tech.top_technologies.first() {
        out.push(format!(
            "{} used in {:.1}% of winners",
            top.technology, top.percentage
        ));
    }
    if let Some(top) = themes.top_themes.first() {
        out.push(format!("{} is the trending theme", top.theme));
    }
    out.push("Study past winners to identify winning patterns".to_string());
    out.push("Focus on shipping a polished MVP over ambitious features".to_string());
    out
}

/// Upper-case the first letter of each whitespace-separated word.
fn display_name(normalized: &str) -> String {
    normalized
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// `part / total * 100` to one decimal; 0 when there is nothing to divide by.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(part as f64 / total as f64 * 100.0)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn median(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_to_one_decimal() {
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(1, 3), 33.3);
        assert_eq!(percentage(3, 3), 100.0);
        assert_eq!(percentage(5, 0), 0.0);
    }

    #[test]
    fn median_of_even_and_odd() {
        assert_eq!(median(vec![4.0, 1.0, 3.0]), 3.0);
        assert_eq!(median(vec![4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn display_name_title_cases_words() {
        assert_eq!(display_name("node.js"), "Node.js");
        assert_eq!(display_name("google cloud"), "Google Cloud");
    }

    #[test]
    fn from_value_rejects_structural_errors() {
        for raw in [
            serde_json::json!([1, 2]),
            serde_json::json!({"organizer_url": "x"}),
            serde_json::json!({"past_hackathons": "nope"}),
            serde_json::json!({"past_hackathons": [{"winners": 3}]}),
        ] {
            let err = HackathonIntelligence::from_value(raw).err();
            assert!(matches!(err, Some(HackIntelError::MalformedDataset(_))));
        }
    }
}
