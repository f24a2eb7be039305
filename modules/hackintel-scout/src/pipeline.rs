//! End-to-end runs: scrape → aggregate → export, reported as a status envelope.

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use hackintel_common::{HistoricalDataset, Result};

use crate::export::{self, ExportFormat};
use crate::intelligence::{HackathonIntelligence, IntelligenceReport, ReportSummary};
use crate::scraper::HistoryScraper;

pub const NO_DATA_MESSAGE: &str = "Could not find past hackathons for this event";

/// Outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PipelineResult {
    Success {
        output_files: BTreeMap<ExportFormat, PathBuf>,
        statistics: ReportSummary,
        insights: Vec<String>,
        report: IntelligenceReport,
    },
    NoData {
        message: String,
    },
    Error {
        message: String,
    },
}

impl PipelineResult {
    pub fn no_data() -> Self {
        Self::NoData {
            message: NO_DATA_MESSAGE.to_string(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::NoData { .. } => "no_data",
            Self::Error { .. } => "error",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

pub struct IntelligenceEngine {
    scraper: Option<HistoryScraper>,
    output_dir: PathBuf,
}

impl IntelligenceEngine {
    pub fn new(scraper: HistoryScraper, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            scraper: Some(scraper),
            output_dir: output_dir.into(),
        }
    }

    /// An engine that only analyzes datasets it is handed.
    pub fn offline(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            scraper: None,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Scrape, aggregate and export one hackathon. Never fails or panics
    /// outward; every problem ends up in the returned envelope.
    pub async fn run_pipeline(
        &self,
        url: &str,
        max_past_editions: usize,
        formats: &BTreeSet<ExportFormat>,
    ) -> PipelineResult {
        info!(url, max_past_editions, ?formats, "Starting intelligence pipeline");
        let run = AssertUnwindSafe(self.run_inner(url, max_past_editions, formats));
        match run.catch_unwind().await {
            Ok(result) => {
                log_result(url, &result);
                result
            }
            Err(panic) => {
                let message = panic_message(panic);
                error!(url, message = message.as_str(), "Pipeline panicked");
                PipelineResult::error(message)
            }
        }
    }

    async fn run_inner(
        &self,
        url: &str,
        max_past_editions: usize,
        formats: &BTreeSet<ExportFormat>,
    ) -> PipelineResult {
        let Some(scraper) = &self.scraper else {
            return PipelineResult::error("No browser configured for scraping");
        };

        let dataset = scraper.scrape_history(url, max_past_editions).await;
        if dataset.past_hackathons.is_empty() {
            return PipelineResult::no_data();
        }
        self.analyze_dataset(dataset, formats)
    }

    /// Aggregate and export an already-scraped dataset.
    pub fn analyze_dataset(
        &self,
        dataset: HistoricalDataset,
        formats: &BTreeSet<ExportFormat>,
    ) -> PipelineResult {
        self.guarded(|| {
            if dataset.past_hackathons.is_empty() {
                return Ok(PipelineResult::no_data());
            }
            self.export(&HackathonIntelligence::new(dataset), formats)
        })
    }

    /// Like [`IntelligenceEngine::analyze_dataset`], from an untyped JSON document.
    pub fn analyze_raw(
        &self,
        raw: serde_json::Value,
        formats: &BTreeSet<ExportFormat>,
    ) -> PipelineResult {
        self.guarded(|| {
            let intelligence = HackathonIntelligence::from_value(raw)?;
            if intelligence.dataset().past_hackathons.is_empty() {
                return Ok(PipelineResult::no_data());
            }
            self.export(&intelligence, formats)
        })
    }

    /// Run the pipeline for each URL in turn.
    pub async fn run_batch(
        &self,
        urls: &[String],
        max_past_editions: usize,
        formats: &BTreeSet<ExportFormat>,
    ) -> Vec<(String, PipelineResult)> {
        let mut results = Vec::with_capacity(urls.len());
        for (i, url) in urls.iter().enumerate() {
            info!(url = url.as_str(), index = i + 1, total = urls.len(), "Batch run");
            let result = self.run_pipeline(url, max_past_editions, formats).await;
            results.push((url.clone(), result));
        }
        results
    }

    fn export(
        &self,
        intelligence: &HackathonIntelligence,
        formats: &BTreeSet<ExportFormat>,
    ) -> Result<PipelineResult> {
        let report = intelligence.analyze();
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        let output_files = export::write_reports(&self.output_dir, &report, formats, &timestamp)?;

        Ok(PipelineResult::Success {
            output_files,
            statistics: report.summary.clone(),
            insights: report.actionable_insights.clone(),
            report,
        })
    }

    fn guarded<F>(&self, f: F) -> PipelineResult
    where
        F: FnOnce() -> Result<PipelineResult>,
    {
        match std::panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                warn!(error = %e, "Analysis failed");
                PipelineResult::error(e.to_string())
            }
            Err(panic) => {
                let message = panic_message(panic);
                error!(message = message.as_str(), "Analysis panicked");
                PipelineResult::error(message)
            }
        }
    }
}

fn log_result(url: &str, result: &PipelineResult) {
    match result {
        PipelineResult::Success {
            statistics,
            output_files,
            ..
        } => info!(
            url,
            editions = statistics.total_past_editions,
            winners = statistics.total_winners_analyzed,
            files = output_files.len(),
            "Pipeline complete"
        ),
        PipelineResult::NoData { message } => warn!(url, message = message.as_str(), "No data"),
        PipelineResult::Error { message } => error!(url, message = message.as_str(), "Pipeline failed"),
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    let detail = if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };
    format!("Pipeline panicked: {detail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_tags_status() {
        let json = serde_json::to_value(PipelineResult::no_data()).unwrap();
        assert_eq!(json["status"], "no_data");
        assert_eq!(json["message"], NO_DATA_MESSAGE);

        let json = serde_json::to_value(PipelineResult::error("boom")).unwrap();
        assert_eq!(json["status"], "error");
        assert!(json.get("output_files").is_none());
    }

    #[test]
    fn panic_payloads_become_messages() {
        let payload: Box<dyn Any + Send> = Box::new("bad index");
        assert_eq!(panic_message(payload), "Pipeline panicked: bad index");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload), "Pipeline panicked: owned");
    }

    #[tokio::test]
    async fn offline_engine_cannot_scrape() {
        let dir = tempfile::tempdir().unwrap();
        let engine = IntelligenceEngine::offline(dir.path());
        let result = engine
            .run_pipeline("https://x.devpost.com", 3, &ExportFormat::all())
            .await;
        assert_eq!(result.status(), "error");
    }
}
