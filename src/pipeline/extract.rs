use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::app::ports::ObjectStorePort;
use crate::constants::{datasets, AWARDS_FILE_NAME, DETAILS_FILE_NAME};
use crate::error::Result;
use crate::types::{AwardEntry, AwardsDocument, FilmDetail};

/// How the local dataset files were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialized {
    /// Every dataset file was already cached locally
    Cached,
    /// Datasets were downloaded and written to the cache
    Downloaded,
}

/// Materializes the two raw datasets in a local directory and decodes them.
pub struct Loader {
    store: Arc<dyn ObjectStorePort>,
    data_dir: PathBuf,
}

impl Loader {
    pub fn new(store: Arc<dyn ObjectStorePort>, data_dir: impl Into<PathBuf>) -> Self {
        Self { store, data_dir: data_dir.into() }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn awards_path(&self) -> PathBuf {
        self.data_dir.join(AWARDS_FILE_NAME)
    }

    pub fn details_path(&self) -> PathBuf {
        self.data_dir.join(DETAILS_FILE_NAME)
    }

    /// True when every dataset file is present in the cache directory.
    pub fn is_cached(&self) -> bool {
        datasets()
            .iter()
            .all(|(_, file_name)| self.data_dir.join(file_name).is_file())
    }

    /// Ensure both dataset files exist locally, fetching them only if any is missing.
    #[instrument(skip(self), fields(data_dir = %self.data_dir.display()))]
    pub async fn materialize(&self) -> Result<Materialized> {
        if self.is_cached() {
            info!("Datasets found in local cache, skipping download");
            return Ok(Materialized::Cached);
        }

        fs::create_dir_all(&self.data_dir)?;
        for (key, file_name) in datasets() {
            info!("Downloading '{}' to {}", key, file_name);
            let bytes = self.store.get_object(key).await?;
            fs::write(self.data_dir.join(file_name), bytes)?;
        }
        Ok(Materialized::Downloaded)
    }

    /// Materialize, then decode both datasets.
    pub async fn load(&self) -> Result<(Vec<AwardEntry>, Vec<FilmDetail>)> {
        self.materialize().await?;
        let awards = read_awards(&self.awards_path())?;
        let details = read_details(&self.details_path())?;
        info!("Loaded {} award entries and {} film details", awards.len(), details.len());
        Ok((awards, details))
    }
}

/// Decode the awards file: `{"results": [{"films": [...]}, ...]}`.
pub fn read_awards(path: &Path) -> Result<Vec<AwardEntry>> {
    let content = fs::read_to_string(path)?;
    parse_awards(&content)
}

pub fn parse_awards(content: &str) -> Result<Vec<AwardEntry>> {
    let document: AwardsDocument = serde_json::from_str(content)?;
    Ok(document.into_entries())
}

/// Decode the details file, one JSON object per line.
pub fn read_details(path: &Path) -> Result<Vec<FilmDetail>> {
    let content = fs::read_to_string(path)?;
    parse_details(&content)
}

pub fn parse_details(content: &str) -> Result<Vec<FilmDetail>> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str::<FilmDetail>(line).map_err(Into::into))
        .collect()
}
