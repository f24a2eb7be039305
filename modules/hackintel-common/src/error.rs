use thiserror::Error;

pub type Result<T> = std::result::Result<T, HackIntelError>;

#[derive(Error, Debug)]
pub enum HackIntelError {
    #[error("Malformed dataset: {0}")]
    MalformedDataset(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(raw)?)
    }

    #[test]
    fn json_errors_convert_with_question_mark() {
        let err = parse("{not json").unwrap_err();
        assert!(matches!(err, HackIntelError::Json(_)));
        assert!(err.to_string().starts_with("JSON error:"));
    }

    #[test]
    fn malformed_dataset_message_names_the_problem() {
        let err = HackIntelError::MalformedDataset("missing past_hackathons".into());
        assert_eq!(err.to_string(), "Malformed dataset: missing past_hackathons");
    }
}
