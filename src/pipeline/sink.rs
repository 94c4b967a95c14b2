use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::types::QualifyingFilm;

const HEADER: [&str; 6] = [
    "name",
    "original_currency",
    "original_budget",
    "original_budget_in_usd",
    "release_date",
    "award_year",
];

/// Write the result table to `path`, creating parent directories as needed.
pub fn write_csv(path: &Path, rows: &[QualifyingFilm]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    write_csv_to(file, rows)?;
    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Write the result table, header first, to any writer.
pub fn write_csv_to<W: Write>(writer: W, rows: &[QualifyingFilm]) -> Result<()> {
    // Header is written explicitly so an empty table still carries its columns
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(HEADER)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row() -> QualifyingFilm {
        QualifyingFilm {
            name: "movie a".to_string(),
            original_currency: "USD".to_string(),
            original_budget: 20.0,
            original_budget_in_usd: "$20000000.0".to_string(),
            release_date: NaiveDate::from_ymd_opt(1954, 10, 3).unwrap(),
            award_year: 1955,
        }
    }

    #[test]
    fn test_header_and_row() {
        let mut buf = Vec::new();
        write_csv_to(&mut buf, &[row()]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "name,original_currency,original_budget,original_budget_in_usd,release_date,award_year\n\
             movie a,USD,20.0,$20000000.0,1954-10-03,1955\n"
        );
    }

    #[test]
    fn test_empty_table_has_header_only() {
        let mut buf = Vec::new();
        write_csv_to(&mut buf, &[]).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "name,original_currency,original_budget,original_budget_in_usd,release_date,award_year\n"
        );
    }

    #[test]
    fn test_name_with_comma_is_quoted() {
        let mut r = row();
        r.name = "crouching tiger, hidden dragon".to_string();
        let mut buf = Vec::new();
        write_csv_to(&mut buf, &[r]).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("\"crouching tiger, hidden dragon\""));
    }

    #[test]
    fn test_write_csv_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("output.csv");
        write_csv(&path, &[row()]).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}
