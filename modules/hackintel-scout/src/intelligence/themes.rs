/// Theme label → lower-case keyword stems matched as plain substrings.
pub const THEME_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "AI/Machine Learning",
        &["ai", "artificial intelligence", "machine learning", "ml", "gpt", "chatbot"],
    ),
    (
        "Sustainability",
        &["sustainable", "eco", "environment", "climate", "green", "renewable"],
    ),
    (
        "Healthcare",
        &["health", "medical", "patient", "diagnosis", "fitness", "wellness"],
    ),
    (
        "Education",
        &["education", "learning", "student", "teach", "study", "course"],
    ),
    (
        "Finance",
        &["finance", "payment", "banking", "crypto", "defi", "wallet"],
    ),
    (
        "Social Impact",
        &["community", "social", "accessibility", "inclusive", "equity"],
    ),
    (
        "Productivity",
        &["productivity", "automation", "workflow", "tool", "efficiency"],
    ),
    ("Gaming", &["game", "gaming", "play", "vr", "ar", "metaverse"]),
];

/// Non-overlapping keyword occurrences of one theme in already lower-cased text.
pub fn mentions(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().map(|kw| text.matches(kw).count()).sum()
}
