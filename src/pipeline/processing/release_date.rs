//! Recognition of the first calendar date in a free-text release-dates field.
//!
//! Release fields look like `"October 3, 1954 (New York) December 1954 (US)"` or
//! `"12 May 1960 (Cannes)"`. Every known date shape is scanned and the match that
//! starts earliest in the text wins. Partial dates are completed to the first day
//! of the missing unit (`"March 1961"` is 1961-03-01, `"1961"` is 1961-01-01).

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const MONTH: &str = r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?";

/// A date shape: its pattern and how to turn a match into a date.
struct DateShape {
    pattern: Regex,
    build: fn(&Captures) -> Option<NaiveDate>,
}

fn shape(pattern: String, build: fn(&Captures) -> Option<NaiveDate>) -> DateShape {
    DateShape {
        pattern: Regex::new(&format!("(?i){}", pattern)).expect("date pattern compiles"),
        build,
    }
}

/// Ordered from most to least specific; on equal start offsets the earlier shape wins.
static SHAPES: Lazy<Vec<DateShape>> = Lazy::new(|| {
    vec![
        // October 3, 1954 / Oct. 3rd 1954
        shape(
            format!(r"\b{MONTH}\s+(\d{{1,2}})(?:st|nd|rd|th)?,?\s+(\d{{4}})\b"),
            |c| ymd(&c[3], month_number(&c[1])?, &c[2]),
        ),
        // 3 October 1954
        shape(
            format!(r"\b(\d{{1,2}})(?:st|nd|rd|th)?\s+{MONTH},?\s+(\d{{4}})\b"),
            |c| ymd(&c[3], month_number(&c[2])?, &c[1]),
        ),
        // 1954-10-03
        shape(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b".to_string(), |c| {
            ymd(&c[1], c[2].parse().ok()?, &c[3])
        }),
        // 10/3/1954
        shape(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b".to_string(), |c| {
            ymd(&c[3], c[1].parse().ok()?, &c[2])
        }),
        // October 1954
        shape(format!(r"\b{MONTH},?\s+(\d{{4}})\b"), |c| {
            ymd(&c[2], month_number(&c[1])?, "1")
        }),
        // 1954
        shape(r"\b(1[89]\d{2}|20\d{2})\b".to_string(), |c| ymd(&c[1], 1, "1")),
    ]
});

/// Find the first recognizable date anywhere in `text`.
///
/// Returns `None` when nothing in the text parses to a valid calendar date.
pub fn find_first_date(text: &str) -> Option<NaiveDate> {
    let mut best: Option<(usize, NaiveDate)> = None;

    for shape in SHAPES.iter() {
        let found = shape
            .pattern
            .captures_iter(text)
            .find_map(|caps| {
                let start = caps.get(0)?.start();
                (shape.build)(&caps).map(|date| (start, date))
            });

        if let Some((start, date)) = found {
            match best {
                Some((best_start, _)) if best_start <= start => {}
                _ => best = Some((start, date)),
            }
        }
    }

    best.map(|(_, date)| date)
}

fn ymd(year: &str, month: u32, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, day.parse().ok()?)
}

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_day_year_with_location_noise() {
        assert_eq!(find_first_date("October 3, 1954 (New York)"), Some(date(1954, 10, 3)));
    }

    #[test]
    fn test_first_of_several_dates_wins() {
        let text = "May 12, 1960 (Cannes)  June 1, 1961 (United States)";
        assert_eq!(find_first_date(text), Some(date(1960, 5, 12)));
    }

    #[test]
    fn test_day_month_year() {
        assert_eq!(find_first_date("12 December 1962 (London)"), Some(date(1962, 12, 12)));
    }

    #[test]
    fn test_abbreviations_and_ordinals() {
        assert_eq!(find_first_date("Premiered Sept. 21st, 1971"), Some(date(1971, 9, 21)));
        assert_eq!(find_first_date("dec 5 1999"), Some(date(1999, 12, 5)));
    }

    #[test]
    fn test_iso_and_numeric() {
        assert_eq!(find_first_date("1975-06-20 (US)"), Some(date(1975, 6, 20)));
        assert_eq!(find_first_date("released 6/20/1975"), Some(date(1975, 6, 20)));
    }

    #[test]
    fn test_partial_dates() {
        assert_eq!(find_first_date("March 1961 (limited)"), Some(date(1961, 3, 1)));
        assert_eq!(find_first_date("1939"), Some(date(1939, 1, 1)));
    }

    #[test]
    fn test_earlier_partial_date_beats_later_full_date() {
        let text = "1953 (festival) October 3, 1954 (wide)";
        assert_eq!(find_first_date(text), Some(date(1953, 1, 1)));
    }

    #[test]
    fn test_invalid_calendar_date_skipped() {
        assert_eq!(
            find_first_date("February 30; March 2, 1990"),
            Some(date(1990, 3, 2))
        );
        // An impossible full date still yields its year
        assert_eq!(find_first_date("February 30, 1990"), Some(date(1990, 1, 1)));
    }

    #[test]
    fn test_no_date() {
        assert_eq!(find_first_date("Unreleased (TBA)"), None);
        assert_eq!(find_first_date(""), None);
        assert_eq!(find_first_date("runtime 120 minutes"), None);
    }

    #[test]
    fn test_year_inside_longer_number_ignored() {
        assert_eq!(find_first_date("catalog 119543"), None);
    }
}
