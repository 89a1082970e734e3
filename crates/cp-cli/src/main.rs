//! Carpinteria command-line front end
//!
//! Loads project documents from a seed file into an in-memory collection,
//! attaches a project store, and prints a status summary or exports the PDF
//! report.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cp_core::config::LoggingConfig;
use cp_core::AppConfig;
use cp_db::MemoryCollection;
use cp_reports::{
    summarize, AggregationSummary, ChartRenderer, LocalExporter, PieChartRenderer,
    ReportExporter, ReportGenerator,
};
use cp_store::ProjectStore;

mod seed;

#[derive(Parser)]
#[command(name = "carpinteria")]
#[command(about = "Summaries and PDF reports for carpentry shop projects", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "CARPINTERIA_CONFIG")]
    config: Option<PathBuf>,

    /// JSON array of project documents to load
    #[arg(short, long)]
    seed: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the number of projects per status
    Summary {
        /// Print JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Render the chart, generate the PDF report and export it
    Report {
        /// Use this PNG/JPEG instead of rendering the pie chart
        #[arg(long)]
        chart: Option<PathBuf>,

        /// Output directory (overrides export.directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    init_tracing(&config.logging);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        collection = %config.store.collection,
        "Starting carpinteria"
    );

    let collection = Arc::new(MemoryCollection::new());
    let entries = seed::load_seed(&cli.seed).await?;
    let loaded = collection
        .seed(&config.store.collection, entries)
        .await
        .context("failed to load seed documents")?;
    info!(documents = loaded.len(), "Seed loaded");

    let store = ProjectStore::connect(collection, &config)
        .await
        .context("failed to attach project store")?;
    let summary = summarize(store.snapshot());

    match cli.command {
        Command::Summary { json } => print_summary(&summary, json)?,
        Command::Report { chart, out } => {
            let directory = out.unwrap_or_else(|| config.export.directory.clone());
            export_report(&config, &summary, chart.as_deref(), &directory).await?;
        }
    }

    store.close();
    Ok(())
}

/// Initialize tracing/logging
///
/// `RUST_LOG` wins over the configured filter.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.filter.as_str()));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn print_summary(summary: &AggregationSummary, json: bool) -> anyhow::Result<()> {
    if json {
        let value = serde_json::json!({
            "counts": summary.counts,
            "unrecognized": summary.unrecognized,
            "records": summary.records.len(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    for (status, count) in summary.counts.iter() {
        println!("{status}: {count}");
    }
    if summary.unrecognized > 0 {
        println!("Sin estado reconocido: {}", summary.unrecognized);
    }
    println!("Total: {}", summary.records.len());
    Ok(())
}

async fn export_report(
    config: &AppConfig,
    summary: &AggregationSummary,
    chart: Option<&Path>,
    directory: &Path,
) -> anyhow::Result<()> {
    let chart = match chart {
        Some(path) => tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read chart image {}", path.display()))?,
        None => PieChartRenderer::default()
            .render(summary)
            .await
            .context("failed to render chart")?
            .to_vec(),
    };

    let artifact = ReportGenerator::new(config.report.clone())
        .generate(summary, Some(chart.as_slice()))
        .context("failed to generate report")?;

    let exporter = LocalExporter::new(directory);
    let receipt = exporter
        .export(&artifact)
        .await
        .with_context(|| format!("failed to export report to {}", directory.display()))?;

    info!(exporter = exporter.name(), pages = artifact.report.page_count(), "Report exported");
    println!("{}", receipt.location.display());
    println!("sha256 {}", receipt.digest);
    Ok(())
}
