//! Output formatting and persistence for dashboard statistics.
//!
//! Supports a plain-text summary, JSON serialization, and one CSV file per
//! chart series for external plotting.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::stats::DashboardStats;

/// Logs dashboard statistics using Rust's debug pretty-print format.
pub fn print_pretty(stats: &DashboardStats) {
    debug!("{:#?}", stats);
}

/// Serializes dashboard statistics as pretty-printed JSON.
pub fn render_json(stats: &DashboardStats) -> Result<String> {
    Ok(serde_json::to_string_pretty(stats)?)
}

/// Renders a short narrative summary of every section.
pub fn render_text(stats: &DashboardStats) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Bike rentals from {} to {} ({} days)",
        stats.range.start, stats.range.end, stats.days
    );
    let _ = writeln!(out, "Total rentals: {}", stats.total_count);
    match stats.mean_count {
        Some(mean) => {
            let _ = writeln!(out, "Average daily rentals: {mean:.1}");
        }
        None => {
            let _ = writeln!(out, "Average daily rentals: n/a");
        }
    }

    if let (Some(peak), Some(trough)) = (stats.hourly.peak, stats.hourly.trough) {
        let _ = writeln!(
            out,
            "Busiest hour: {:02}:00 ({:.1} rentals on average)",
            peak.hour, peak.mean_count
        );
        let _ = writeln!(
            out,
            "Quietest hour: {:02}:00 ({:.1} rentals on average)",
            trough.hour, trough.mean_count
        );
    }

    if !stats.seasons.seasons.is_empty() {
        let _ = writeln!(out, "Rentals by season:");
        for s in &stats.seasons.seasons {
            let marker = if stats.seasons.dominant.as_deref() == Some(s.label.as_str()) {
                " *"
            } else {
                ""
            };
            let _ = writeln!(
                out,
                "  {:<16} {:>10} ({:.1}%){marker}",
                s.label, s.total, s.share_percent
            );
        }
    }

    if !stats.weather.is_empty() {
        let _ = writeln!(out, "Casual vs registered by weather:");
        for w in &stats.weather {
            let label = w
                .label
                .clone()
                .unwrap_or_else(|| format!("code {}", w.weather_situation));
            let _ = writeln!(
                out,
                "  {:<16} casual {:>10}  registered {:>10}",
                label, w.casual_total, w.registered_total
            );
        }
    }

    for warning in &stats.warnings {
        let _ = writeln!(out, "warning: {warning}");
    }

    out
}

#[derive(Serialize)]
struct HourlyRow {
    hour: u8,
    mean_count: f64,
    is_peak: bool,
    is_trough: bool,
}

#[derive(Serialize)]
struct SeasonRow<'a> {
    code: u8,
    label: &'a str,
    total: u64,
    share_percent: f64,
    is_dominant: bool,
}

#[derive(Serialize)]
struct WeatherRow<'a> {
    weather_situation: u8,
    label: &'a str,
    casual_total: u64,
    registered_total: u64,
}

/// Writes every chart series of `stats` as a CSV file under `dir`.
///
/// Creates `dir` if needed and overwrites existing files. Returns the
/// paths written.
pub fn export_series(dir: &Path, stats: &DashboardStats) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let hourly_rows = stats.hourly.hours.iter().map(|h| HourlyRow {
        hour: h.hour,
        mean_count: h.mean_count,
        is_peak: stats.hourly.peak.is_some_and(|p| p.hour == h.hour),
        is_trough: stats.hourly.trough.is_some_and(|t| t.hour == h.hour),
    });
    let season_rows = stats.seasons.seasons.iter().map(|s| SeasonRow {
        code: s.code,
        label: &s.label,
        total: s.total,
        share_percent: s.share_percent,
        is_dominant: stats.seasons.dominant.as_deref() == Some(s.label.as_str()),
    });
    let weather_rows = stats.weather.iter().map(|w| WeatherRow {
        weather_situation: w.weather_situation,
        label: w.label.as_deref().unwrap_or(""),
        casual_total: w.casual_total,
        registered_total: w.registered_total,
    });

    let paths = vec![
        write_records(&dir.join("daily_trend.csv"), stats.daily_trend.iter())?,
        write_records(&dir.join("hourly_profile.csv"), hourly_rows)?,
        write_records(&dir.join("season_profile.csv"), season_rows)?,
        write_records(&dir.join("weather_split.csv"), weather_rows)?,
    ];

    info!(dir = %dir.display(), files = paths.len(), "Chart series exported");
    Ok(paths)
}

/// Writes `rows` to a fresh CSV file at `path`, header included.
///
/// An empty series still produces a file, containing no rows.
pub fn write_records<I, T>(path: &Path, rows: I) -> Result<PathBuf>
where
    I: IntoIterator<Item = T>,
    T: Serialize,
{
    debug!(path = %path.display(), "Writing CSV series");

    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::RentalDataset;
    use crate::labels::LabelConfig;
    use crate::records::{DailyRecord, HourlyRecord};
    use chrono::NaiveDate;
    use std::env;

    fn temp_dir(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    fn create_stats() -> DashboardStats {
        let date = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let daily = vec![
            DailyRecord {
                date: date(1),
                count: 10,
                casual: 3,
                registered: 7,
                season: 1,
                weather_situation: 1,
            },
            DailyRecord {
                date: date(2),
                count: 20,
                casual: 5,
                registered: 15,
                season: 2,
                weather_situation: 2,
            },
        ];
        let hourly = vec![
            HourlyRecord {
                date: date(1),
                hour: 8,
                count: 30,
            },
            HourlyRecord {
                date: date(1),
                hour: 3,
                count: 2,
            },
        ];
        let ds = RentalDataset::from_records(daily, hourly, LabelConfig::default()).unwrap();
        DashboardStats::build(&ds, None, None).unwrap()
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&create_stats());
    }

    #[test]
    fn test_render_json_contains_sections() {
        let json = render_json(&create_stats()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_count"], 30);
        assert_eq!(value["mean_count"], 15.0);
        assert_eq!(value["hourly"]["peak"]["hour"], 8);
        assert_eq!(value["seasons"]["dominant"], "Summer");
        assert_eq!(value["range"]["start"], "2024-01-01");
    }

    #[test]
    fn test_render_text_mentions_key_figures() {
        let text = render_text(&create_stats());
        assert!(text.contains("Total rentals: 30"));
        assert!(text.contains("Average daily rentals: 15.0"));
        assert!(text.contains("Busiest hour: 08:00"));
        assert!(text.contains("Quietest hour: 03:00"));
        assert!(text.contains("Summer"));
        assert!(text.contains("Mist"));
    }

    #[test]
    fn test_export_series_writes_four_files() {
        let dir = temp_dir("bike_rental_dashboard_test_export");
        let _ = fs::remove_dir_all(&dir);

        let paths = export_series(&dir, &create_stats()).unwrap();
        assert_eq!(paths.len(), 4);
        for path in &paths {
            assert!(path.exists());
        }

        let hourly = fs::read_to_string(dir.join("hourly_profile.csv")).unwrap();
        let lines: Vec<_> = hourly.lines().collect();
        assert_eq!(lines[0], "hour,mean_count,is_peak,is_trough");
        assert_eq!(lines[1], "3,2.0,false,true");
        assert_eq!(lines[2], "8,30.0,true,false");

        let trend = fs::read_to_string(dir.join("daily_trend.csv")).unwrap();
        assert_eq!(trend.lines().count(), 3);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_records_empty_series() {
        let dir = temp_dir("bike_rental_dashboard_test_empty");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("empty.csv");

        let rows: Vec<crate::analyzers::types::DailyPoint> = Vec::new();
        write_records(&path, rows).unwrap();
        assert!(path.exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
