//! The filter/derive pipeline that turns award entries and film details into
//! qualifying films.
//!
//! Each detail record passes through the stages below in order; the first stage
//! that rejects it records a [`DropReason`] and the record is excluded:
//!
//! 1. release date recognition and award year derivation
//! 2. eligibility (`award_year > AWARD_YEAR_CUTOFF`)
//! 3. budget presence
//! 4. currency screening (USD only)
//! 5. magnitude and numeric extraction (millions, upper bound of ranges)
//! 6. budget threshold
//! 7. case-insensitive title join against award entries, winners only

use chrono::{Datelike, NaiveDate};
use metrics::counter;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, instrument};

use super::budget::{classify_currency, parse_millions};
use super::release_date::find_first_date;
use super::{DropReason, StageOutcome};
use crate::constants::{AWARD_YEAR_CUTOFF, MIN_BUDGET_MILLIONS, USD};
use crate::types::{format_float, AwardEntry, FilmDetail, QualifyingFilm};

/// A detail record with its release date resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedFilm<'a> {
    pub detail: &'a FilmDetail,
    pub release_date: Option<NaiveDate>,
}

/// A detail record that has passed the eligibility filter.
#[derive(Debug, Clone, PartialEq)]
pub struct EligibleFilm<'a> {
    pub detail: &'a FilmDetail,
    pub release_date: NaiveDate,
    pub award_year: i32,
}

/// A detail record that passed every per-record stage and awaits the join.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenedFilm {
    /// Lower-cased title, the join key
    pub name: Option<String>,
    pub release_date: NaiveDate,
    pub award_year: i32,
    /// Budget in millions of US dollars
    pub original_budget: f64,
}

/// Counts describing one transform run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransformReport {
    pub award_entries: usize,
    pub film_details: usize,
    pub qualifying_films: usize,
    pub dropped: BTreeMap<DropReason, usize>,
}

impl TransformReport {
    pub fn total_dropped(&self) -> usize {
        self.dropped.values().sum()
    }

    pub fn dropped_for(&self, reason: DropReason) -> usize {
        self.dropped.get(&reason).copied().unwrap_or(0)
    }

    fn record_drop(&mut self, title: Option<&str>, reason: DropReason) {
        debug!(title = title.unwrap_or("<untitled>"), %reason, "Dropping film detail");
        counter!("etl_records_dropped_total", "reason" => reason.as_str()).increment(1);
        *self.dropped.entry(reason).or_insert(0) += 1;
    }
}

/// Stage 1: first recognizable release date, if any.
pub fn date_stage(detail: &FilmDetail) -> DatedFilm<'_> {
    let release_date = detail.release_dates_raw.as_deref().and_then(find_first_date);
    DatedFilm { detail, release_date }
}

/// Stage 2: derive the award year and keep only films eligible after the cutoff.
///
/// A missing date yields no year, which cannot satisfy the cutoff.
pub fn eligibility_stage(film: DatedFilm<'_>) -> StageOutcome<EligibleFilm<'_>> {
    let release_date = film.release_date.ok_or(DropReason::NoReleaseDate)?;
    let award_year = release_date.year() + 1;
    if award_year <= AWARD_YEAR_CUTOFF {
        return Err(DropReason::BeforeCutoff);
    }
    Ok(EligibleFilm { detail: film.detail, release_date, award_year })
}

/// Stages 3 to 6: budget presence, currency, magnitude, numeric extraction and threshold.
pub fn budget_stage(film: EligibleFilm<'_>) -> StageOutcome<ScreenedFilm> {
    let raw = film.detail.budget_raw.as_deref().ok_or(DropReason::MissingBudget)?;
    let dollars = classify_currency(raw)?;
    let original_budget = parse_millions(dollars)?;
    // NaN fails every comparison and must not slip past the threshold
    if original_budget.is_nan() || original_budget < MIN_BUDGET_MILLIONS {
        return Err(DropReason::BelowThreshold);
    }
    Ok(ScreenedFilm {
        name: film.detail.title.as_deref().map(str::to_lowercase),
        release_date: film.release_date,
        award_year: film.award_year,
        original_budget,
    })
}

/// Run every per-record stage over one detail record.
pub fn screen_detail(detail: &FilmDetail) -> StageOutcome<ScreenedFilm> {
    eligibility_stage(date_stage(detail)).and_then(budget_stage)
}

/// Run the per-record stages over all details, keeping input order.
pub fn screen_details(details: &[FilmDetail]) -> Vec<StageOutcome<ScreenedFilm>> {
    details.iter().map(screen_detail).collect()
}

/// Index award entries by lower-cased title, keeping input order within a title.
fn index_awards(awards: &[AwardEntry]) -> HashMap<String, Vec<&AwardEntry>> {
    let mut index: HashMap<String, Vec<&AwardEntry>> = HashMap::new();
    for entry in awards {
        if let Some(title) = entry.film_title.as_deref() {
            index.entry(title.to_lowercase()).or_default().push(entry);
        }
    }
    index
}

/// Stage 7: join a screened film to its winning award entries.
///
/// One output row is produced per winning entry with the same lower-cased title.
pub fn join_stage(
    film: &ScreenedFilm,
    index: &HashMap<String, Vec<&AwardEntry>>,
) -> StageOutcome<Vec<QualifyingFilm>> {
    let name = film.name.as_ref().ok_or(DropReason::NoAwardMatch)?;
    let entries = index.get(name).ok_or(DropReason::NoAwardMatch)?;

    let rows: Vec<QualifyingFilm> = entries
        .iter()
        .filter(|entry| entry.is_winner)
        .map(|_| shape_output(name, film))
        .collect();

    if rows.is_empty() {
        return Err(DropReason::NotWinner);
    }
    Ok(rows)
}

fn shape_output(name: &str, film: &ScreenedFilm) -> QualifyingFilm {
    let in_usd = film.original_budget * 1_000_000.0;
    QualifyingFilm {
        name: name.to_string(),
        original_currency: USD.to_string(),
        original_budget: film.original_budget,
        original_budget_in_usd: format!("${}", format_float(in_usd)),
        release_date: film.release_date,
        award_year: film.award_year,
    }
}

/// Produce the qualifying films table.
pub fn transform(awards: &[AwardEntry], details: &[FilmDetail]) -> Vec<QualifyingFilm> {
    transform_with_report(awards, details).0
}

/// Produce the qualifying films table along with per-reason drop counts.
#[instrument(skip_all, fields(awards = awards.len(), details = details.len()))]
pub fn transform_with_report(
    awards: &[AwardEntry],
    details: &[FilmDetail],
) -> (Vec<QualifyingFilm>, TransformReport) {
    let mut report = TransformReport {
        award_entries: awards.len(),
        film_details: details.len(),
        ..TransformReport::default()
    };

    let index = index_awards(awards);
    let mut rows = Vec::new();

    for (detail, outcome) in details.iter().zip(screen_details(details)) {
        let joined = outcome.and_then(|film| join_stage(&film, &index));
        match joined {
            Ok(mut film_rows) => rows.append(&mut film_rows),
            Err(reason) => report.record_drop(detail.title.as_deref(), reason),
        }
    }

    report.qualifying_films = rows.len();
    info!(
        "Transform produced {} qualifying films ({} details dropped)",
        report.qualifying_films,
        report.total_dropped()
    );

    (rows, report)
}
