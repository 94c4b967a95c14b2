use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// A nominated or winning film from the awards dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwardEntry {
    #[serde(rename = "Detail URL", default)]
    pub detail_url: Option<String>,
    #[serde(rename = "Film", default)]
    pub film_title: Option<String>,
    #[serde(rename = "Producer(s)", default)]
    pub producers: Option<Value>,
    #[serde(rename = "Production Company(s)", default)]
    pub production_companies: Option<Value>,
    #[serde(rename = "Wiki URL", default)]
    pub wiki_url: Option<String>,
    #[serde(rename = "Winner", default, deserialize_with = "null_as_false")]
    pub is_winner: bool,
}

impl AwardEntry {
    pub fn new(film_title: &str, is_winner: bool) -> Self {
        Self {
            detail_url: None,
            film_title: Some(film_title.to_string()),
            producers: None,
            production_companies: None,
            wiki_url: None,
            is_winner,
        }
    }
}

/// One year of the awards file; only the film list is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct AwardYear {
    #[serde(default)]
    pub films: Vec<AwardEntry>,
}

/// Top-level shape of the awards file.
#[derive(Debug, Clone, Deserialize)]
pub struct AwardsDocument {
    #[serde(default)]
    pub results: Vec<AwardYear>,
}

impl AwardsDocument {
    pub fn into_entries(self) -> Vec<AwardEntry> {
        self.results.into_iter().flat_map(|year| year.films).collect()
    }
}

/// Production metadata for a film. Budget and release dates are free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmDetail {
    #[serde(rename = "Title", default, deserialize_with = "loose_text")]
    pub title: Option<String>,
    #[serde(rename = " Release dates ", default, deserialize_with = "loose_text")]
    pub release_dates_raw: Option<String>,
    #[serde(rename = "Budget", default, deserialize_with = "loose_text")]
    pub budget_raw: Option<String>,
    #[serde(rename = "Detail URL", default)]
    pub detail_url: Option<String>,
    /// Remaining descriptive fields (director, cast, box office, ...), kept as-is.
    #[serde(flatten)]
    pub descriptive: BTreeMap<String, Value>,
}

impl FilmDetail {
    pub fn new(title: &str, release_dates_raw: &str, budget_raw: Option<&str>) -> Self {
        Self {
            title: Some(title.to_string()),
            release_dates_raw: Some(release_dates_raw.to_string()),
            budget_raw: budget_raw.map(str::to_string),
            detail_url: None,
            descriptive: BTreeMap::new(),
        }
    }
}

/// Output row. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualifyingFilm {
    pub name: String,
    pub original_currency: String,
    #[serde(serialize_with = "serialize_float")]
    pub original_budget: f64,
    pub original_budget_in_usd: String,
    pub release_date: NaiveDate,
    pub award_year: i32,
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// Accepts a string, a list of strings (joined by a space) or a number as free text.
fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| value_to_text(&v)))
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(value_to_text).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(" "))
            }
        }
        Value::Object(_) => None,
    }
}

fn serialize_float<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_float(*value))
}

/// Shortest round-trip rendering with a trailing `.0` for integral values (`20.0`, `22.5`).
pub fn format_float(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{}.0", text)
    } else {
        text
    }
}
