use hackintel_common::Result;

use super::report::IntelligenceReport;

const NARRATIVE_TECHNOLOGIES: usize = 5;

/// Pretty-printed JSON. Field order is fixed by the report types, so equal
/// reports render byte-identically.
pub fn to_json(report: &IntelligenceReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn to_markdown(report: &IntelligenceReport) -> String {
    let s = &report.summary;
    let mut md = String::from("# Hackathon Intelligence Report\n\n");
    md.push_str("## Summary\n");
    md.push_str(&format!("- **Platform**: {}\n", s.platform));
    md.push_str(&format!("- **Organizer**: {}\n", s.organizer));
    md.push_str(&format!("- **Past Editions**: {}\n", s.total_past_editions));
    md.push_str(&format!("- **Winners Analyzed**: {}\n", s.total_winners_analyzed));
    md.push_str("\n---\n\n");

    md.push_str("## Top Technologies\n\n");
    let techs = &report.tech_stack_analysis.top_technologies;
    if techs.is_empty() {
        md.push_str("_No technology data._\n");
    }
    for t in techs.iter().take(NARRATIVE_TECHNOLOGIES) {
        md.push_str(&format!(
            "- **{}**: {:.1}% ({} projects)\n",
            t.technology, t.percentage, t.count
        ));
    }

    md.push_str("\n## Winning Themes\n\n");
    let themes = &report.winning_themes.all_themes;
    if themes.is_empty() {
        md.push_str("_No recurring themes._\n");
    }
    for t in themes {
        md.push_str(&format!(
            "- **{}**: {} mentions ({:.1}%)\n",
            t.theme, t.mentions, t.percentage
        ));
    }

    if let Some(rec) = &report.team_size_trends.recommendation {
        md.push_str("\n## Team Size\n\n");
        md.push_str(&format!("- {rec}\n"));
    }

    md.push_str("\n## Strategic Insights\n\n");
    for insight in &report.actionable_insights {
        md.push_str(&format!("- {insight}\n"));
    }

    md.push_str("\n---\n\n*Report generated by Historical Intelligence Engine*\n");
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::HackathonIntelligence;
    use hackintel_common::HistoricalDataset;

    #[test]
    fn empty_report_renders_without_sections_breaking() {
        let mut ds = HistoricalDataset::new("https://x.devpost.com");
        ds.past_hackathons.push(Default::default());
        let report = HackathonIntelligence::new(ds).analyze();

        let md = to_markdown(&report);
        assert!(md.starts_with("# Hackathon Intelligence Report"));
        assert!(md.contains("- **Organizer**: N/A"));
        assert!(md.contains("_No technology data._"));
        assert!(md.contains("- Study past winners to identify winning patterns"));
        assert!(!md.contains("## Team Size"));

        let json = to_json(&report).unwrap();
        assert_eq!(json, to_json(&report).unwrap());
    }

    #[test]
    fn populated_report_renders_every_section() {
        let mut ds = HistoricalDataset::new("https://x.devpost.com");
        ds.past_hackathons.push(hackintel_common::HackathonEdition {
            winners: vec![hackintel_common::WinningProject {
                title: "MedBot".into(),
                url: "https://devpost.com/software/medbot".into(),
                tagline: "Health chatbot".into(),
                prize: "Grand Prize".into(),
                technologies: vec!["Python".into()],
                team_size: Some(3.0),
            }],
            ..Default::default()
        });
        let md = to_markdown(&HackathonIntelligence::new(ds).analyze());

        assert!(md.contains("## Summary\n- **Platform**: devpost\n"));
        assert!(md.contains("- **Python**: 100.0% (1 projects)\n"));
        assert!(md.contains("## Team Size\n\n- Winning teams average 3.0 members\n"));
        assert!(md.contains("- Python used in 100.0% of winners\n"));
        assert!(md.ends_with("*Report generated by Historical Intelligence Engine*\n"));
    }
}
