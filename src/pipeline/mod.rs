// Batch pipeline: extract, transform, and CSV sink

pub mod extract;
pub mod processing;
pub mod sink;

use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::{info, instrument};

use crate::error::Result;
use extract::Loader;
use processing::transform::{transform_with_report, TransformReport};

/// Result of a complete pipeline run
#[derive(Debug, Serialize)]
pub struct PipelineResult {
    pub report: TransformReport,
    pub output_file: String,
    pub duration_secs: f64,
}

pub struct Pipeline;

impl Pipeline {
    /// Load both datasets, transform them and write the result table to `output_path`.
    #[instrument(skip(loader), fields(output = %output_path.display()))]
    pub async fn run(loader: &Loader, output_path: &Path) -> Result<PipelineResult> {
        let started = Instant::now();

        info!("Extracting datasets...");
        let (awards, details) = loader.load().await?;

        info!("Transforming {} film details...", details.len());
        let (rows, report) = transform_with_report(&awards, &details);

        sink::write_csv(output_path, &rows)?;

        Ok(PipelineResult {
            report,
            output_file: output_path.to_string_lossy().to_string(),
            duration_secs: started.elapsed().as_secs_f64(),
        })
    }
}
