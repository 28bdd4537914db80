//! CSV parsers for the daily and hourly rental datasets.

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use tracing::debug;

use crate::error::DashboardError;
use crate::labels::LabelConfig;
use crate::records::{DailyRecord, HourlyRecord};

/// Parses daily rows from `reader`, validating every row against `labels`.
///
/// Rows are returned sorted by date.
///
/// # Errors
///
/// Returns [`DashboardError::MalformedRecord`] for the first row that fails
/// to deserialize, breaks a row invariant, or repeats an earlier date.
pub fn parse_daily<R: Read>(
    reader: R,
    source_name: &str,
    labels: &LabelConfig,
) -> Result<Vec<DailyRecord>, DashboardError> {
    let mut seen: HashMap<NaiveDate, u64> = HashMap::new();
    let mut rows = Vec::new();

    for_each_row(reader, source_name, |line, record: DailyRecord| {
        record
            .validate(labels)
            .map_err(|msg| DashboardError::malformed(source_name, line, msg))?;
        if let Some(first) = seen.insert(record.date, line) {
            return Err(DashboardError::malformed(
                source_name,
                line,
                format!("date {} already appeared at line {first}", record.date),
            ));
        }
        rows.push(record);
        Ok(())
    })?;

    rows.sort_by_key(|r| r.date);
    debug!(source = source_name, rows = rows.len(), "Parsed daily records");
    Ok(rows)
}

/// Parses hourly rows from `reader`.
///
/// # Errors
///
/// Returns [`DashboardError::MalformedRecord`] for the first row that fails
/// to deserialize or has an hour outside 0-23.
pub fn parse_hourly<R: Read>(
    reader: R,
    source_name: &str,
) -> Result<Vec<HourlyRecord>, DashboardError> {
    let mut rows = Vec::new();

    for_each_row(reader, source_name, |line, record: HourlyRecord| {
        record
            .validate()
            .map_err(|msg| DashboardError::malformed(source_name, line, msg))?;
        rows.push(record);
        Ok(())
    })?;

    debug!(source = source_name, rows = rows.len(), "Parsed hourly records");
    Ok(rows)
}

pub fn load_daily(path: &str, labels: &LabelConfig) -> Result<Vec<DailyRecord>, DashboardError> {
    parse_daily(open(path)?, path, labels)
}

pub fn load_hourly(path: &str) -> Result<Vec<HourlyRecord>, DashboardError> {
    parse_hourly(open(path)?, path)
}

fn open(path: &str) -> Result<File, DashboardError> {
    File::open(path).map_err(|source| DashboardError::Io {
        path: path.to_string(),
        source,
    })
}

/// Deserializes each data row by header name and hands it to `f` along
/// with its 1-based line number.
fn for_each_row<R, T, F>(reader: R, source_name: &str, mut f: F) -> Result<(), DashboardError>
where
    R: Read,
    T: DeserializeOwned,
    F: FnMut(u64, T) -> Result<(), DashboardError>,
{
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| csv_error(source_name, &e))?
        .clone();

    let mut record = StringRecord::new();
    loop {
        match rdr.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => return Err(csv_error(source_name, &e)),
        }
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row: T = record
            .deserialize(Some(&headers))
            .map_err(|e| DashboardError::malformed(source_name, line, e.to_string()))?;
        f(line, row)?;
    }

    Ok(())
}

fn csv_error(source_name: &str, err: &csv::Error) -> DashboardError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    DashboardError::malformed(source_name, line, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_HEADER: &str = "instant,dteday,season,yr,mnth,weathersit,casual,registered,cnt\n";

    fn parse_days(body: &str) -> Result<Vec<DailyRecord>, DashboardError> {
        let csv = format!("{DAY_HEADER}{body}");
        parse_daily(csv.as_bytes(), "day.csv", &LabelConfig::default())
    }

    fn malformed_line(err: DashboardError) -> u64 {
        match err {
            DashboardError::MalformedRecord { line, .. } => line,
            other => panic!("expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_daily_ignores_extra_columns_and_sorts() {
        let rows = parse_days(
            "2,2024-01-02,1,0,1,2,5,15,20\n\
             1,2024-01-01,1,0,1,1,3,7,10\n",
        )
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(rows[0].count, 10);
        assert_eq!(rows[1].weather_situation, 2);
        assert_eq!(rows[1].registered, 15);
    }

    #[test]
    fn test_parse_daily_empty_body() {
        let rows = parse_days("").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_parse_daily_non_numeric_count() {
        let err = parse_days("1,2024-01-01,1,0,1,1,3,7,ten\n").unwrap_err();
        assert_eq!(malformed_line(err), 2);
    }

    #[test]
    fn test_parse_daily_bad_date() {
        let err = parse_days("1,01/01/2024,1,0,1,1,3,7,10\n").unwrap_err();
        assert_eq!(malformed_line(err), 2);
    }

    #[test]
    fn test_parse_daily_invalid_season() {
        let err = parse_days(
            "1,2024-01-01,1,0,1,1,3,7,10\n\
             2,2024-01-02,7,0,1,1,3,7,10\n",
        )
        .unwrap_err();
        assert_eq!(malformed_line(err), 3);
    }

    #[test]
    fn test_parse_daily_duplicate_date() {
        let err = parse_days(
            "1,2024-01-01,1,0,1,1,3,7,10\n\
             2,2024-01-01,1,0,1,1,3,7,10\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("already appeared at line 2"));
    }

    #[test]
    fn test_parse_daily_negative_count() {
        let err = parse_days("1,2024-01-01,1,0,1,1,3,7,-10\n").unwrap_err();
        assert!(matches!(err, DashboardError::MalformedRecord { .. }));
    }

    #[test]
    fn test_parse_hourly() {
        let csv = "instant,dteday,hr,cnt\n\
                   1,2024-01-01,0,16\n\
                   2,2024-01-01,1,40\n";
        let rows = parse_hourly(csv.as_bytes(), "hour.csv").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].hour, 1);
        assert_eq!(rows[1].count, 40);
    }

    #[test]
    fn test_parse_hourly_hour_out_of_range() {
        let csv = "dteday,hr,cnt\n2024-01-01,24,16\n";
        let err = parse_hourly(csv.as_bytes(), "hour.csv").unwrap_err();
        assert_eq!(malformed_line(err), 2);
    }

    #[test]
    fn test_parse_hourly_missing_column() {
        let csv = "dteday,cnt\n2024-01-01,16\n";
        let err = parse_hourly(csv.as_bytes(), "hour.csv").unwrap_err();
        assert!(matches!(err, DashboardError::MalformedRecord { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_hourly("/nonexistent/hour_data.csv").unwrap_err();
        assert!(matches!(err, DashboardError::Io { .. }));
    }
}
