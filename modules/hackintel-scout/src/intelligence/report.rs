use serde::{Deserialize, Serialize};

use super::prizes::PrizeTier;

/// Aggregate statistics over every winner of every analyzed edition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntelligenceReport {
    pub summary: ReportSummary,
    pub tech_stack_analysis: TechStackAnalysis,
    pub team_size_trends: TeamSizeTrends,
    pub winning_themes: ThemeAnalysis,
    pub prize_distribution: PrizeDistribution,
    pub actionable_insights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_past_editions: usize,
    pub total_winners_analyzed: usize,
    pub platform: String,
    /// Organizer profile URL, or `"N/A"`.
    pub organizer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnologyStat {
    pub technology: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TechStackAnalysis {
    /// Headline subset of `all_technologies`.
    pub top_technologies: Vec<TechnologyStat>,
    pub all_technologies: Vec<TechnologyStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSizeTrends {
    pub data_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_team_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub median_team_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TeamSizeTrends {
    pub fn unavailable() -> Self {
        Self {
            data_available: false,
            average_team_size: None,
            median_team_size: None,
            recommendation: None,
            message: Some("Team size data not available".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeStat {
    pub theme: String,
    pub mentions: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThemeAnalysis {
    pub top_themes: Vec<ThemeStat>,
    pub all_themes: Vec<ThemeStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeTierCount {
    pub tier: PrizeTier,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeDistribution {
    /// One row per tier, in [`PrizeTier::ALL`] order.
    pub prize_breakdown: Vec<PrizeTierCount>,
    pub total_prizes_awarded: usize,
}

impl PrizeDistribution {
    pub fn count(&self, tier: PrizeTier) -> usize {
        self.prize_breakdown
            .iter()
            .find(|row| row.tier == tier)
            .map_or(0, |row| row.count)
    }
}
