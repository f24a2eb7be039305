use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrizeTier {
    #[serde(rename = "Grand Prize / 1st Place")]
    GrandPrize,
    #[serde(rename = "2nd Place")]
    SecondPlace,
    #[serde(rename = "3rd Place")]
    ThirdPlace,
    #[serde(rename = "Category Prize")]
    Category,
    #[serde(rename = "Sponsor/Track Prize")]
    SponsorTrack,
    #[serde(rename = "Other")]
    Other,
}

impl PrizeTier {
    /// Classification order; the first tier whose keywords match wins.
    pub const ALL: [PrizeTier; 6] = [
        PrizeTier::GrandPrize,
        PrizeTier::SecondPlace,
        PrizeTier::ThirdPlace,
        PrizeTier::Category,
        PrizeTier::SponsorTrack,
        PrizeTier::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PrizeTier::GrandPrize => "Grand Prize / 1st Place",
            PrizeTier::SecondPlace => "2nd Place",
            PrizeTier::ThirdPlace => "3rd Place",
            PrizeTier::Category => "Category Prize",
            PrizeTier::SponsorTrack => "Sponsor/Track Prize",
            PrizeTier::Other => "Other",
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            PrizeTier::GrandPrize => &["grand", "overall", "1st"],
            PrizeTier::SecondPlace => &["2nd"],
            PrizeTier::ThirdPlace => &["3rd"],
            PrizeTier::Category => &["best"],
            PrizeTier::SponsorTrack => &["sponsor", "track"],
            PrizeTier::Other => &[],
        }
    }

    /// Bucket a free-text prize label. Blank labels are not prizes.
    pub fn classify(label: &str) -> Option<PrizeTier> {
        let label = label.trim().to_lowercase();
        if label.is_empty() {
            return None;
        }
        let tier = Self::ALL
            .into_iter()
            .find(|tier| tier.keywords().iter().any(|kw| label.contains(kw)))
            .unwrap_or(PrizeTier::Other);
        Some(tier)
    }
}
