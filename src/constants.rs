//! Dataset names and business-rule constants shared across the pipeline.

// Object store keys
pub const AWARDS_OBJECT_KEY: &str = "movies";
pub const DETAILS_OBJECT_KEY: &str = "movie-details";

// Local cache file names
pub const AWARDS_FILE_NAME: &str = "movies_file.json";
pub const DETAILS_FILE_NAME: &str = "movie_details_file.json";

pub const DEFAULT_DATA_DIR: &str = "etl/data";
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "output.csv";
pub const DEFAULT_REGION: &str = "us-east-1";

/// Films must be awards-eligible strictly after this year.
pub const AWARD_YEAR_CUTOFF: i32 = 1954;

/// Minimum budget, in millions of US dollars.
pub const MIN_BUDGET_MILLIONS: f64 = 15.0;

pub const USD: &str = "USD";

/// All datasets as (object key, local file name) pairs, in load order.
pub fn datasets() -> [(&'static str, &'static str); 2] {
    [
        (AWARDS_OBJECT_KEY, AWARDS_FILE_NAME),
        (DETAILS_OBJECT_KEY, DETAILS_FILE_NAME),
    ]
}
