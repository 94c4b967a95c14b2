pub mod budget;
pub mod release_date;
pub mod transform;

use serde::Serialize;
use std::fmt;

/// Why a record was excluded from the result table.
///
/// Ineligible and unparseable records are both simply excluded; the reason exists for
/// diagnostics only and never reaches the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DropReason {
    /// No recognizable date in the release field
    NoReleaseDate,
    /// Award year at or before the cutoff
    BeforeCutoff,
    MissingBudget,
    /// Euro or Pound budget
    ForeignCurrency,
    MissingDollarSign,
    /// Budget not expressed in millions
    NotInMillions,
    /// Numeric part empty or glued to its unit
    MalformedBudget,
    UnparseableBudget,
    BelowThreshold,
    /// Title has no award entry
    NoAwardMatch,
    /// Every matching award entry is a nomination only
    NotWinner,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::NoReleaseDate => "no_release_date",
            DropReason::BeforeCutoff => "before_cutoff",
            DropReason::MissingBudget => "missing_budget",
            DropReason::ForeignCurrency => "foreign_currency",
            DropReason::MissingDollarSign => "missing_dollar_sign",
            DropReason::NotInMillions => "not_in_millions",
            DropReason::MalformedBudget => "malformed_budget",
            DropReason::UnparseableBudget => "unparseable_budget",
            DropReason::BelowThreshold => "below_threshold",
            DropReason::NoAwardMatch => "no_award_match",
            DropReason::NotWinner => "not_winner",
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single stage: the retained value, or the reason the record was dropped.
pub type StageOutcome<T> = Result<T, DropReason>;
