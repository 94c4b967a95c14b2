use std::fmt;
use std::path::PathBuf;

use crate::constants::{DEFAULT_DATA_DIR, DEFAULT_OUTPUT_FILE_NAME, DEFAULT_REGION};
use crate::error::{EtlError, Result};

/// Runtime configuration for the loader and the CSV sink.
///
/// Built once at startup; a missing required variable is fatal before any I/O happens.
#[derive(Clone)]
pub struct Config {
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub bucket_name: String,
    pub region: String,
    /// Base URL objects are fetched from, without a trailing slash.
    pub endpoint: String,
    pub data_dir: PathBuf,
    pub output_path: PathBuf,
}

impl Config {
    /// Load `.env` (if present) and read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &str| {
            optional(key).ok_or_else(|| {
                EtlError::Config(format!("missing required environment variable '{}'", key))
            })
        };

        let aws_access_key_id = required("AWS_ACCESS_KEY_ID")?;
        let aws_secret_access_key = required("AWS_SECRET_ACCESS_KEY")?;
        let bucket_name = required("BUCKET_NAME")?;
        let region = optional("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string());

        let endpoint = optional("S3_ENDPOINT")
            .map(|e| e.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("https://{}.s3.{}.amazonaws.com", bucket_name, region));

        let data_dir = PathBuf::from(optional("ETL_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()));
        let output_path = optional("ETL_OUTPUT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(DEFAULT_OUTPUT_FILE_NAME));

        Ok(Self {
            aws_access_key_id,
            aws_secret_access_key,
            bucket_name,
            region,
            endpoint,
            data_dir,
            output_path,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("aws_access_key_id", &"<redacted>")
            .field("aws_secret_access_key", &"<redacted>")
            .field("bucket_name", &self.bucket_name)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("data_dir", &self.data_dir)
            .field("output_path", &self.output_path)
            .finish()
    }
}
