//! Budget text parsing: currency screening and extraction of a USD amount in millions.

use super::DropReason;

const EURO_SIGN: char = '€';
const POUND_SIGN: char = '£';
const EN_DASH: char = '–';

/// Screen the currency of a raw budget and return the text after the last `$`.
///
/// Euro and Pound budgets are rejected rather than converted.
pub fn classify_currency(raw: &str) -> Result<&str, DropReason> {
    if raw.contains(EURO_SIGN) || raw.contains(POUND_SIGN) {
        return Err(DropReason::ForeignCurrency);
    }
    match raw.rsplit_once('$') {
        Some((_, after)) => Ok(after),
        None => Err(DropReason::MissingDollarSign),
    }
}

/// Parse dollar-stripped budget text (e.g. `"18–22 million"`) into millions.
///
/// Ranges resolve to their upper bound. Anything that is not expressed in millions
/// or does not reduce to a plain number is rejected.
pub fn parse_millions(text: &str) -> Result<f64, DropReason> {
    let lowered = text.to_lowercase();
    if !lowered.contains("million") {
        return Err(DropReason::NotInMillions);
    }

    let upper = last_segment(&lowered, EN_DASH);
    let number = upper.split(' ').next().unwrap_or_default();
    if number.is_empty() || number.contains("million") {
        return Err(DropReason::MalformedBudget);
    }

    last_segment(number, '-')
        .parse::<f64>()
        .map_err(|_| DropReason::UnparseableBudget)
}

fn last_segment(text: &str, separator: char) -> &str {
    text.rsplit(separator).next().unwrap_or(text)
}
