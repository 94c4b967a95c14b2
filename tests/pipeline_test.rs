use anyhow::Result;
use async_trait::async_trait;
use award_budget_etl::app::ports::ObjectStorePort;
use award_budget_etl::error::EtlError;
use award_budget_etl::pipeline::extract::{Loader, Materialized};
use award_budget_etl::pipeline::Pipeline;
use award_budget_etl::DropReason;
use serde_json::json;
use std::collections::HashMap;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

/// In-memory object store that counts requests.
struct FakeStore {
    objects: HashMap<String, Vec<u8>>,
    calls: AtomicUsize,
}

impl FakeStore {
    fn new(objects: &[(&str, String)]) -> Self {
        Self {
            objects: objects
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone().into_bytes()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStorePort for FakeStore {
    async fn get_object(&self, key: &str) -> award_budget_etl::Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.objects.get(key).cloned().ok_or_else(|| EtlError::Storage {
            key: key.to_string(),
            message: "404 Not Found - NoSuchKey".to_string(),
        })
    }
}

fn awards_json() -> String {
    json!({
        "results": [
            {
                "year": "1955 (28th)",
                "films": [
                    {"Detail URL": "/wiki/Movie_A", "Film": "Movie A", "Producer(s)": "P", "Production Company(s)": "C", "Wiki URL": "https://en.wikipedia.org/wiki/Movie_A", "Winner": true},
                    {"Film": "Movie B", "Winner": false}
                ]
            },
            {
                "year": "1961 (34th)",
                "films": [
                    {"Film": "MOVIE C", "Winner": true},
                    {"Film": "Movie D", "Winner": true},
                    {"Film": "Movie E", "Winner": true}
                ]
            }
        ]
    })
    .to_string()
}

fn details_jsonl() -> String {
    [
        json!({"Title": "Movie A", " Release dates ": "October 3, 1954 (New York)", "Budget": "$20 million", "Directed by": "Someone"}),
        json!({"Title": "Movie B", " Release dates ": "May 1, 1960", "Budget": "$30 million"}),
        json!({"Title": "Movie C", " Release dates ": ["June 2, 1960 (Cannes)", "July 4, 1960 (US)"], "Budget": "$18–22 million"}),
        json!({"Title": "Movie D", " Release dates ": "1960", "Budget": "€20 million"}),
        json!({"Title": "Movie E", " Release dates ": "unknown", "Budget": "$50 million"}),
        json!({"Title": "Movie F", " Release dates ": "1970", "Budget": null}),
    ]
    .iter()
    .map(|v| v.to_string())
    .collect::<Vec<_>>()
    .join("\n")
}

fn fake_store() -> Arc<FakeStore> {
    Arc::new(FakeStore::new(&[
        ("movies", awards_json()),
        ("movie-details", details_jsonl()),
    ]))
}

#[tokio::test]
async fn test_downloads_when_cache_empty() -> Result<()> {
    let dir = tempdir()?;
    let data_dir = dir.path().join("data");
    let store = fake_store();
    let loader = Loader::new(store.clone(), &data_dir);

    assert!(!loader.is_cached());
    assert_eq!(loader.materialize().await?, Materialized::Downloaded);
    assert_eq!(store.calls(), 2);
    assert!(data_dir.join("movies_file.json").is_file());
    assert!(data_dir.join("movie_details_file.json").is_file());

    // Second run uses the cache
    assert_eq!(loader.materialize().await?, Materialized::Cached);
    assert_eq!(store.calls(), 2);
    Ok(())
}

#[tokio::test]
async fn test_cache_short_circuits_remote() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("movies_file.json"), awards_json())?;
    fs::write(dir.path().join("movie_details_file.json"), details_jsonl())?;

    let store = Arc::new(FakeStore::new(&[]));
    let loader = Loader::new(store.clone(), dir.path());
    let (awards, details) = loader.load().await?;

    assert_eq!(store.calls(), 0);
    assert_eq!(awards.len(), 5);
    assert_eq!(details.len(), 6);
    Ok(())
}

#[tokio::test]
async fn test_partial_cache_triggers_download() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("movies_file.json"), "stale")?;

    let store = fake_store();
    let loader = Loader::new(store.clone(), dir.path());
    let (awards, _) = loader.load().await?;

    assert_eq!(store.calls(), 2);
    assert_eq!(awards.len(), 5);
    Ok(())
}

#[tokio::test]
async fn test_missing_object_is_fatal() -> Result<()> {
    let dir = tempdir()?;
    let store = Arc::new(FakeStore::new(&[("movies", awards_json())]));
    let loader = Loader::new(store, dir.path());

    let err = loader.load().await.unwrap_err();
    assert!(matches!(err, EtlError::Storage { ref key, .. } if key == "movie-details"));
    Ok(())
}

#[tokio::test]
async fn test_full_pipeline_writes_expected_csv() -> Result<()> {
    let dir = tempdir()?;
    let loader = Loader::new(fake_store(), dir.path().join("data"));
    let output = dir.path().join("out").join("output.csv");

    let result = Pipeline::run(&loader, &output).await?;

    let csv = fs::read_to_string(&output)?;
    assert_eq!(
        csv,
        "name,original_currency,original_budget,original_budget_in_usd,release_date,award_year\n\
         movie a,USD,20.0,$20000000.0,1954-10-03,1955\n\
         movie c,USD,22.0,$22000000.0,1960-06-02,1961\n"
    );

    let report = result.report;
    assert_eq!(report.qualifying_films, 2);
    assert_eq!(report.dropped_for(DropReason::NotWinner), 1);
    assert_eq!(report.dropped_for(DropReason::ForeignCurrency), 1);
    assert_eq!(report.dropped_for(DropReason::NoReleaseDate), 1);
    assert_eq!(report.dropped_for(DropReason::MissingBudget), 1);
    assert_eq!(report.total_dropped(), 4);
    Ok(())
}

#[tokio::test]
async fn test_rerun_is_idempotent() -> Result<()> {
    let dir = tempdir()?;
    let loader = Loader::new(fake_store(), dir.path().join("data"));
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");

    Pipeline::run(&loader, &first).await?;
    Pipeline::run(&loader, &second).await?;

    assert_eq!(fs::read_to_string(first)?, fs::read_to_string(second)?);
    Ok(())
}
