use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use survey_harvester::crawling::HarvestPipeline;
use survey_harvester::domain::constants::export;
use survey_harvester::infrastructure::config::{ConfigManager, DelayRange, HarvestConfig};
use survey_harvester::infrastructure::{init_logging_with_config, json_export};

/// Harvest survey results into a JSON file
#[derive(Parser, Debug)]
#[command(name = "survey-harvester", version)]
#[command(about = "Harvests survey listing pages and their result detail pages", long_about = None)]
struct Args {
    /// Config file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of results to collect
    #[arg(short, long)]
    limit: Option<usize>,

    /// First listing page
    #[arg(long)]
    start_page: Option<u32>,

    /// Last listing page; without it the walk stops on a page with no new results
    #[arg(long)]
    end_page: Option<u32>,

    /// Output JSON file, `-` for stdout
    #[arg(short, long, default_value = export::DEFAULT_OUTPUT_FILE)]
    output: String,

    /// Disable the random pause between requests
    #[arg(long)]
    no_delay: bool,

    /// Detail pages fetched at once
    #[arg(long)]
    concurrency: Option<usize>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn apply(&self, config: &mut HarvestConfig) {
        if let Some(limit) = self.limit {
            config.walk.limit = Some(limit);
        }
        if let Some(start_page) = self.start_page {
            config.walk.start_page = start_page;
        }
        if let Some(end_page) = self.end_page {
            config.walk.end_page = Some(end_page);
        }
        if self.no_delay {
            config.delay = DelayRange::NONE;
        }
        if let Some(concurrency) = self.concurrency {
            config.detail_concurrency = concurrency;
        }
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
    }
}

fn load_config(args: &Args) -> Result<HarvestConfig> {
    let manager = match &args.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let mut config = manager.load_config()?;
    args.apply(&mut config);
    config.validate()?;
    Ok(config)
}

async fn harvest(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    init_logging_with_config(&config.logging)?;

    let pipeline = HarvestPipeline::from_config(&config)?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling harvest");
            on_signal.cancel();
        }
    });

    let (records, summary) = pipeline.run_with_summary(&cancel).await?;
    if summary.degraded > 0 {
        warn!("{} of {} records are missing their detail fields", summary.degraded, summary.entries);
    }

    if args.output == "-" {
        json_export::write_records_to_stdout(&records).await?;
    } else {
        json_export::save_records(Path::new(&args.output), &records)
            .await
            .context("Failed to export records")?;
        info!("Records written to {}", args.output);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match harvest(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
