//! Aggregation tests: hand-built HistoricalDataset → analyze() → assert.
//!
//! No browser, no I/O.

use hackintel_common::{HackathonEdition, WinningProject};
use hackintel_scout::intelligence::{render, HackathonIntelligence, PrizeTier};
use hackintel_scout::testing::{dataset, edition, project};

fn analyze(editions: Vec<HackathonEdition>) -> hackintel_scout::IntelligenceReport {
    HackathonIntelligence::new(dataset(editions)).analyze()
}

// ---------------------------------------------------------------------------
// Technologies
// ---------------------------------------------------------------------------

#[test]
fn two_editions_three_winners_technology_shares() {
    let report = analyze(vec![
        edition(
            "Hack 2023",
            Some("2023"),
            vec![
                project("Alpha", "1st Place", &["Python", "React"]),
                project("Beta", "", &["Python"]),
            ],
        ),
        edition("Hack 2022", Some("2022"), vec![project("Gamma", "", &[])]),
    ]);

    assert_eq!(report.summary.total_past_editions, 2);
    assert_eq!(report.summary.total_winners_analyzed, 3);

    let techs = &report.tech_stack_analysis.top_technologies;
    assert_eq!(techs.len(), 2);
    assert_eq!(techs[0].technology, "Python");
    assert_eq!(techs[0].count, 2);
    assert_eq!(techs[0].percentage, 66.7);
    assert_eq!(techs[1].technology, "React");
    assert_eq!(techs[1].count, 1);
    assert_eq!(techs[1].percentage, 33.3);

    assert_eq!(report.actionable_insights[0], "Python used in 66.7% of winners");
}

#[test]
fn technology_tags_normalized_before_counting() {
    let report = analyze(vec![edition(
        "Hack",
        None,
        vec![
            project("A", "", &["Python", " python "]),
            project("B", "", &["node.js", "Google Cloud"]),
        ],
    )]);

    let all = &report.tech_stack_analysis.all_technologies;
    assert_eq!(all[0].technology, "Python");
    assert_eq!(all[0].count, 2);
    assert_eq!(all[0].percentage, 100.0);
    assert_eq!(all[1].technology, "Node.js");
    assert_eq!(all[2].technology, "Google Cloud");
}

#[test]
fn ties_keep_first_seen_order() {
    let report = analyze(vec![edition(
        "Hack",
        None,
        vec![
            project("A", "", &["Rust", "Go"]),
            project("B", "", &["Go", "Rust", "Zig"]),
        ],
    )]);

    let names: Vec<&str> = report
        .tech_stack_analysis
        .all_technologies
        .iter()
        .map(|t| t.technology.as_str())
        .collect();
    assert_eq!(names, vec!["Rust", "Go", "Zig"]);
}

#[test]
fn technology_tables_are_truncated() {
    let tags: Vec<String> = (0..25).map(|i| format!("tech{i}")).collect();
    let refs: Vec<&str> = tags.iter().map(String::as_str).collect();
    let report = analyze(vec![edition("Hack", None, vec![project("A", "", &refs)])]);

    assert_eq!(report.tech_stack_analysis.all_technologies.len(), 20);
    assert_eq!(report.tech_stack_analysis.top_technologies.len(), 10);
    assert_eq!(
        report.tech_stack_analysis.top_technologies[..],
        report.tech_stack_analysis.all_technologies[..10]
    );
}

// ---------------------------------------------------------------------------
// Zero winners / duplicates / determinism
// ---------------------------------------------------------------------------

#[test]
fn zero_winners_yields_empty_tables_and_fixed_insights() {
    let report = analyze(vec![
        edition("Hack 2023", Some("2023"), vec![]),
        edition("Hack 2022", Some("2022"), vec![]),
    ]);

    assert_eq!(report.summary.total_past_editions, 2);
    assert_eq!(report.summary.total_winners_analyzed, 0);
    assert!(report.tech_stack_analysis.all_technologies.is_empty());
    assert!(report.winning_themes.all_themes.is_empty());
    assert!(!report.team_size_trends.data_available);
    assert_eq!(report.prize_distribution.total_prizes_awarded, 0);
    assert!(report
        .prize_distribution
        .prize_breakdown
        .iter()
        .all(|row| row.count == 0));
    assert_eq!(
        report.actionable_insights,
        vec![
            "Study past winners to identify winning patterns",
            "Focus on shipping a polished MVP over ambitious features",
        ]
    );
}

#[test]
fn duplicate_urls_within_an_edition_count_once() {
    let a = project("PlantPal", "Grand Prize", &["Python"]);
    let b = project("Other", "", &["Go"]);
    let report = analyze(vec![
        edition("Hack 2023", None, vec![a.clone(), b, a.clone()]),
        // Same project in another edition is a separate win.
        edition("Hack 2022", None, vec![a]),
    ]);

    assert_eq!(report.summary.total_winners_analyzed, 3);
    assert_eq!(report.prize_distribution.count(PrizeTier::GrandPrize), 2);
}

#[test]
fn aggregation_is_deterministic() {
    let ds = dataset(vec![edition(
        "Hack 2023",
        Some("2023"),
        vec![
            project("AI Tutor", "Best Education Hack", &["Python", "OpenAI"]),
            project("EcoTrack", "2nd Place", &["React", "Python"]),
        ],
    )]);

    let first = HackathonIntelligence::new(ds.clone()).analyze();
    let second = HackathonIntelligence::new(ds).analyze();
    assert_eq!(first, second);
    assert_eq!(render::to_json(&first).unwrap(), render::to_json(&second).unwrap());
    assert_eq!(render::to_markdown(&first), render::to_markdown(&second));
}

// ---------------------------------------------------------------------------
// Themes
// ---------------------------------------------------------------------------

#[test]
fn hyphenated_ai_counts_toward_ai_theme() {
    let mut w = project("AI-powered Tutor", "", &[]);
    w.tagline = "Personal help".to_string();
    let report = analyze(vec![edition("Hack", None, vec![w])]);

    let top = &report.winning_themes.top_themes[0];
    assert_eq!(top.theme, "AI/Machine Learning");
    assert!(top.mentions >= 1);
    assert!(report
        .actionable_insights
        .contains(&"AI/Machine Learning is the trending theme".to_string()));
}

#[test]
fn themes_ranked_and_zero_mentions_dropped() {
    let mut a = project("MedBot", "", &[]);
    a.tagline = "Health chatbot for patient triage".to_string();
    let mut b = project("Ledger", "", &[]);
    b.tagline = "Crypto wallet".to_string();
    let report = analyze(vec![edition("Hack", None, vec![a, b])]);

    let themes: Vec<(&str, usize)> = report
        .winning_themes
        .all_themes
        .iter()
        .map(|t| (t.theme.as_str(), t.mentions))
        .collect();
    // Healthcare and Finance tie at 2; table order breaks the tie.
    assert_eq!(themes[0], ("Healthcare", 2));
    assert!(themes.iter().all(|(_, n)| *n > 0));
    assert!(!themes.iter().any(|(name, _)| *name == "Gaming"));
    assert_eq!(report.winning_themes.all_themes[0].percentage, 100.0);
}

// ---------------------------------------------------------------------------
// Prizes
// ---------------------------------------------------------------------------

#[test]
fn prize_breakdown_in_fixed_tier_order() {
    let report = analyze(vec![edition(
        "Hack",
        None,
        vec![
            project("A", "Grand Prize - Sponsored by Acme", &[]),
            project("B", "2nd Place", &[]),
            project("C", "Best Use of Maps", &[]),
            project("D", "Fintech Track", &[]),
            project("E", "People's Choice", &[]),
            project("F", "", &[]),
        ],
    )]);

    let pd = &report.prize_distribution;
    let tiers: Vec<PrizeTier> = pd.prize_breakdown.iter().map(|r| r.tier).collect();
    assert_eq!(tiers, PrizeTier::ALL.to_vec());
    assert_eq!(pd.count(PrizeTier::GrandPrize), 1);
    assert_eq!(pd.count(PrizeTier::SecondPlace), 1);
    assert_eq!(pd.count(PrizeTier::ThirdPlace), 0);
    assert_eq!(pd.count(PrizeTier::Category), 1);
    assert_eq!(pd.count(PrizeTier::SponsorTrack), 1);
    assert_eq!(pd.count(PrizeTier::Other), 1);
    assert_eq!(pd.total_prizes_awarded, 5);
}

// ---------------------------------------------------------------------------
// Team size
// ---------------------------------------------------------------------------

#[test]
fn team_size_stats_when_present() {
    let sized = |title: &str, size: f64| WinningProject {
        team_size: Some(size),
        ..project(title, "", &[])
    };
    let report = analyze(vec![edition(
        "Hack",
        None,
        vec![
            sized("A", 2.0),
            sized("B", 4.0),
            sized("C", 3.0),
            sized("D", 0.0),
            project("E", "", &[]),
        ],
    )]);

    let t = &report.team_size_trends;
    assert!(t.data_available);
    assert_eq!(t.average_team_size, Some(3.0));
    assert_eq!(t.median_team_size, Some(3.0));
    assert_eq!(
        t.recommendation.as_deref(),
        Some("Winning teams average 3.0 members")
    );
}

#[test]
fn team_size_absent_by_default() {
    let report = analyze(vec![edition("Hack", None, vec![project("A", "", &[])])]);
    let json = serde_json::to_value(&report.team_size_trends).unwrap();
    assert_eq!(json["data_available"], false);
    assert_eq!(json["message"], "Team size data not available");
    assert!(json.get("average_team_size").is_none());
}

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

#[test]
fn raw_dataset_with_missing_optional_fields_loads() {
    let raw = serde_json::json!({
        "past_hackathons": [
            {"winners": [{"title": "Solo", "url": "https://devpost.com/software/solo"}]},
            {"hackathon_name": "Empty", "year": ""}
        ]
    });
    let report = HackathonIntelligence::from_value(raw).unwrap().analyze();

    assert_eq!(report.summary.total_past_editions, 2);
    assert_eq!(report.summary.total_winners_analyzed, 1);
    assert_eq!(report.summary.platform, "devpost");
    assert_eq!(report.summary.organizer, "N/A");
}
