use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use hackintel_common::Config;
use hackintel_scout::scraper::{browser_from_config, HistoryScraper, ScraperConfig};
use hackintel_scout::{ExportFormat, IntelligenceEngine, PipelineResult};

#[derive(Parser)]
#[command(name = "hackintel-scout", about = "Historical hackathon intelligence")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape past editions of a hackathon and write a report
    Analyze {
        url: String,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Scrape past editions and print the raw dataset
    Scrape {
        url: String,
        #[arg(long)]
        max_editions: Option<usize>,
        /// Write the dataset here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Build a report from a dataset file written by `scrape`
    Report {
        dataset: PathBuf,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Analyze several hackathons one after another
    Batch {
        #[arg(required = true)]
        urls: Vec<String>,
        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Past editions to scrape (defaults to MAX_PAST_EDITIONS)
    #[arg(long)]
    max_editions: Option<usize>,
    /// structured|json, narrative|markdown; repeatable
    #[arg(long = "format", default_values = ["structured", "narrative"])]
    formats: Vec<String>,
}

impl RunArgs {
    fn formats(&self) -> BTreeSet<ExportFormat> {
        ExportFormat::parse_all(&self.formats)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("hackintel=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    config.log_redacted();

    match cli.command {
        Command::Analyze { url, run } => {
            let engine = engine(&config)?;
            let max = run.max_editions.unwrap_or(config.max_past_editions);
            let result = engine.run_pipeline(&url, max, &run.formats()).await;
            emit(&result)
        }
        Command::Scrape {
            url,
            max_editions,
            out,
        } => {
            let scraper = scraper(&config)?;
            let max = max_editions.unwrap_or(config.max_past_editions);
            let dataset = scraper.scrape_history(&url, max).await;
            let json = serde_json::to_string_pretty(&dataset)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(path = %path.display(), editions = dataset.past_hackathons.len(), "Dataset written");
                }
                None => println!("{json}"),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Report { dataset, run } => {
            let raw = std::fs::read_to_string(&dataset)
                .with_context(|| format!("Failed to read {}", dataset.display()))?;
            let result = match serde_json::from_str(&raw) {
                Ok(value) => IntelligenceEngine::offline(&config.reports_dir)
                    .analyze_raw(value, &run.formats()),
                Err(e) => PipelineResult::error(format!("Invalid JSON in {}: {e}", dataset.display())),
            };
            emit(&result)
        }
        Command::Batch { urls, run } => {
            let engine = engine(&config)?;
            let max = run.max_editions.unwrap_or(config.max_past_editions);
            let results = engine.run_batch(&urls, max, &run.formats()).await;

            let failed = results.iter().filter(|(_, r)| !r.is_success()).count();
            let envelope: serde_json::Map<String, serde_json::Value> = results
                .into_iter()
                .map(|(url, r)| -> Result<(String, serde_json::Value)> {
                    Ok((url, serde_json::to_value(r)?))
                })
                .collect::<Result<_>>()?;
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            info!(total = envelope.len(), failed, "Batch complete");

            Ok(if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}

fn scraper(config: &Config) -> Result<HistoryScraper> {
    let browser = browser_from_config(config)?;
    info!(browser = browser.name(), "Browser ready");
    HistoryScraper::new(browser, ScraperConfig::from(config))
}

fn engine(config: &Config) -> Result<IntelligenceEngine> {
    Ok(IntelligenceEngine::new(scraper(config)?, &config.reports_dir))
}

fn emit(result: &PipelineResult) -> Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(match result {
        PipelineResult::Error { .. } => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}
