pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod types;

// Ports and their adapters
pub mod app;
pub mod infra;

pub use config::Config;
pub use error::{EtlError, Result};
pub use pipeline::processing::transform::{transform, transform_with_report, TransformReport};
pub use pipeline::processing::DropReason;
pub use types::{AwardEntry, FilmDetail, QualifyingFilm};
