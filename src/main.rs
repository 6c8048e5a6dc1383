//! ReportBuddy - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use reportbuddy::{
    cli::{Args, Commands, Verbosity},
    config::Config,
    delivery::{run_scheduler, save_report, DailyBatch, FileSink},
    reports::{available_report_types, ReportDispatcher},
    store::{load_records, EmbeddingEngine, MarketingRecord, QdrantStore, SalesRecord},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let verbosity = args.verbosity();
    init_logging(verbosity);

    if !args.command.needs_config() {
        list_types();
        return Ok(());
    }

    let config = Config::load(args.config.clone())?;

    match &args.command {
        Commands::Types => list_types(),
        Commands::Config { save } => show_config(&config, args.config.as_deref(), *save)?,
        Commands::Stats => show_stats(&config).await?,
        Commands::Clear => clear_collection(&config).await?,
        Commands::Ingest { sales, marketing } => ingest(&config, sales, marketing, verbosity).await?,
        Commands::Daily => run_daily(&config, verbosity).await?,
        Commands::Schedule => run_schedule(&config).await?,
        Commands::Custom { prompt_file, .. } => {
            let prompt = std::fs::read_to_string(prompt_file)
                .with_context(|| format!("Failed to read prompt file {}", prompt_file.display()))?;
            let dispatcher = ReportDispatcher::from_config(&config)?;

            let pb = spinner(verbosity, "Running custom analysis...");
            let result = dispatcher.generate_custom_report(&prompt).await;
            pb.finish_and_clear();

            emit_report(&config, &result?, args.command.output(), verbosity)?;
        }
        Commands::Report {
            query,
            category,
            results,
            ..
        } => {
            let n_results = results.unwrap_or(config.retrieval.default_results);
            let dispatcher = ReportDispatcher::from_config(&config)?;

            let pb = spinner(verbosity, &format!("Generating {} report...", category));
            let result = dispatcher.generate_report(query, *category, n_results).await;
            pb.finish_and_clear();

            emit_report(&config, &result?, args.command.output(), verbosity)?;
        }
        command => {
            let kind = command
                .report_kind()
                .context("Command does not describe a report")?;
            let dispatcher = ReportDispatcher::from_config(&config)?;

            let pb = spinner(verbosity, &format!("Generating {} report...", kind.key()));
            let result = dispatcher.generate_kind(&kind).await;
            pb.finish_and_clear();

            emit_report(&config, &result?, command.output(), verbosity)?;
        }
    }

    Ok(())
}

fn init_logging(verbosity: Verbosity) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn spinner(verbosity: Verbosity, message: &str) -> ProgressBar {
    if !verbosity.show_progress() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Print the report, and save it when an output file was requested
fn emit_report(config: &Config, report: &str, output: Option<&PathBuf>, verbosity: Verbosity) -> Result<()> {
    println!("{}", report);

    if let Some(output) = output {
        let path = save_report(&config.report_dir(), report, Some(output.as_path()))?;
        if verbosity.show_progress() {
            eprintln!("{} Saved report to {}", "✓".green(), path.display());
        }
    }
    Ok(())
}

fn list_types() {
    println!("{}", "Available report types:".bold());
    for (key, description) in available_report_types() {
        println!("  {:<20} {}", key.cyan(), description);
    }
}

fn show_config(config: &Config, path: Option<&Path>, save: bool) -> Result<()> {
    let rendered = toml::to_string_pretty(config).context("Failed to render configuration")?;
    println!("{}", "ReportBuddy Configuration".bold());
    if let Some(path) = Config::default_path() {
        println!("{}", format!("# default location: {}", path.display()).dimmed());
    }
    println!();
    println!("{}", rendered);

    if save {
        let target = path
            .map(Path::to_path_buf)
            .or_else(Config::default_path)
            .context("No home directory for the default config file")?;
        config.save(&target)?;
        println!("{} Saved configuration to {}", "✓".green(), target.display());
    }
    Ok(())
}

fn connect_store(config: &Config) -> Result<QdrantStore> {
    let embedder = Arc::new(EmbeddingEngine::new(&config.vector_store.embedding_model)?);
    Ok(QdrantStore::connect(&config.vector_store, embedder)?)
}

async fn show_stats(config: &Config) -> Result<()> {
    let store = connect_store(config)?;
    let stats = store.stats().await?;

    println!("{}", "Vector index".bold());
    println!("  Collection: {}", stats.collection_name);
    println!("  Documents:  {}", stats.total_documents);
    Ok(())
}

async fn clear_collection(config: &Config) -> Result<()> {
    let store = connect_store(config)?;
    if store.clear().await? {
        println!("{} Cleared collection '{}'", "✓".green(), store.collection());
    } else {
        println!("Collection '{}' does not exist.", store.collection());
    }
    Ok(())
}

async fn ingest(config: &Config, sales: &Path, marketing: &Path, verbosity: Verbosity) -> Result<()> {
    let sales_records: Vec<SalesRecord> = load_records(sales)?;
    let marketing_records: Vec<MarketingRecord> = load_records(marketing)?;

    let documents: Vec<_> = sales_records
        .iter()
        .map(SalesRecord::to_stored)
        .chain(marketing_records.iter().map(MarketingRecord::to_stored))
        .collect();

    let store = connect_store(config)?;
    store.ensure_collection().await?;

    let pb = spinner(verbosity, &format!("Embedding {} records...", documents.len()));
    let result = store.upsert(documents).await;
    pb.finish_and_clear();
    let stored = result?;

    println!(
        "{} Loaded {} sales and {} marketing records ({} points) into '{}'",
        "✓".green(),
        sales_records.len(),
        marketing_records.len(),
        stored,
        store.collection()
    );
    Ok(())
}

fn daily_batch(config: &Config) -> Result<DailyBatch> {
    let dispatcher = Arc::new(ReportDispatcher::from_config(config)?);
    Ok(DailyBatch::new(dispatcher, config.schedule.summary_quarter.clone())
        .with_sink(Box::new(FileSink::new(config.report_dir()))))
}

async fn run_daily(config: &Config, verbosity: Verbosity) -> Result<()> {
    let batch = daily_batch(config)?;

    let pb = spinner(verbosity, "Generating daily reports...");
    let result = batch.run().await;
    pb.finish_and_clear();

    let generated = result?;
    for report in &generated.reports {
        println!(
            "{} {} -> {}_{}.txt",
            "✓".green(),
            report.title,
            report.name,
            generated.stamp()
        );
    }
    Ok(())
}

async fn run_schedule(config: &Config) -> Result<()> {
    let batch = daily_batch(config)?;
    println!(
        "{} Daily reports scheduled at {} (UTC{:+}min). Press Ctrl-C to stop.",
        "⏰".yellow(),
        config.schedule.time,
        config.schedule.utc_offset_minutes
    );
    run_scheduler(&batch, &config.schedule).await?;
    Ok(())
}
