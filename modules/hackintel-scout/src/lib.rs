pub mod export;
pub mod intelligence;
pub mod pipeline;
pub mod scraper;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use export::ExportFormat;
pub use intelligence::{HackathonIntelligence, IntelligenceReport};
pub use pipeline::{IntelligenceEngine, PipelineResult};
pub use scraper::{HistoryScraper, ScraperConfig};
