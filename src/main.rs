use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use award_budget_etl::config::Config;
use award_budget_etl::infra::s3_client::S3Client;
use award_budget_etl::logging;
use award_budget_etl::pipeline::extract::{read_awards, read_details, Loader};
use award_budget_etl::pipeline::sink;
use award_budget_etl::pipeline::Pipeline;
use award_budget_etl::{transform_with_report, TransformReport};

#[derive(Parser)]
#[command(name = "award_budget_etl")]
#[command(about = "Find award-winning films released after 1953 with a budget of at least $15M")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the raw datasets into the local cache (skipped when already cached)
    Extract,
    /// Extract, transform and write the result CSV (default)
    Run {
        /// Override the configured output path
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Transform local dataset files without any remote access
    Transform {
        /// Awards file (`{"results": [{"films": [...]}]}`)
        #[arg(long)]
        awards: PathBuf,
        /// Film details file (JSON Lines)
        #[arg(long)]
        details: PathBuf,
        /// Output CSV path; stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn build_loader(config: &Config) -> Loader {
    let store = Arc::new(S3Client::from_config(config));
    Loader::new(store, config.data_dir.clone())
}

fn log_report(report: &TransformReport) {
    info!(
        "Details: {}, award entries: {}, qualifying films: {}",
        report.film_details, report.award_entries, report.qualifying_films
    );
    for (reason, count) in &report.dropped {
        info!("   dropped {:>5} ({})", count, reason);
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Extract => {
            let config = Config::from_env()?;
            info!("Using configuration: {:?}", config);
            let loader = build_loader(&config);
            let outcome = loader.materialize().await.context("failed to materialize datasets")?;
            let awards = read_awards(&loader.awards_path())?;
            let details = read_details(&loader.details_path())?;
            info!(
                "Datasets {:?}: {} award entries, {} film details",
                outcome,
                awards.len(),
                details.len()
            );
        }
        Commands::Run { output } => {
            let config = Config::from_env()?;
            info!("Using configuration: {:?}", config);
            let loader = build_loader(&config);
            let output_path = output.unwrap_or_else(|| config.output_path.clone());
            let result = Pipeline::run(&loader, &output_path)
                .await
                .context("pipeline run failed")?;
            log_report(&result.report);
            info!("Output file: {} ({:.2}s)", result.output_file, result.duration_secs);
        }
        Commands::Transform { awards: awards_path, details: details_path, output } => {
            let awards = read_awards(&awards_path)
                .with_context(|| format!("failed to read awards from {}", awards_path.display()))?;
            let details = read_details(&details_path)
                .with_context(|| format!("failed to read details from {}", details_path.display()))?;
            let (rows, report) = transform_with_report(&awards, &details);
            log_report(&report);
            match output {
                Some(path) => sink::write_csv(&path, &rows)?,
                None => sink::write_csv_to(std::io::stdout().lock(), &rows)?,
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    logging::init_logging();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run { output: None });

    if let Err(e) = run(command).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
