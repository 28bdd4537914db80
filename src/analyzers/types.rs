//! Data types produced by the aggregation pipeline.

use chrono::NaiveDate;
use serde::Serialize;

/// Mean rentals for one hour of the day across the whole hourly dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourlyMean {
    pub hour: u8,
    pub mean_count: f64,
}

/// Per-hour means ordered by hour, plus the busiest and quietest hours.
///
/// Hours with no records are absent. `peak` and `trough` are `None` only
/// when `hours` is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyProfile {
    pub hours: Vec<HourlyMean>,
    pub peak: Option<HourlyMean>,
    pub trough: Option<HourlyMean>,
}

/// Rentals summed over every filtered day of one season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonTotal {
    pub code: u8,
    pub label: String,
    pub total: u64,
    /// Share of the filtered total, in percent.
    pub share_percent: f64,
}

/// Season totals in label-table order, limited to seasons that occur in
/// the filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonProfile {
    pub seasons: Vec<SeasonTotal>,
    pub dominant: Option<String>,
}

impl SeasonProfile {
    /// Total for a season label, if that season occurs in the view.
    pub fn total_for(&self, label: &str) -> Option<u64> {
        self.seasons
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.total)
    }

    pub fn grand_total(&self) -> u64 {
        self.seasons.iter().map(|s| s.total).sum()
    }
}

/// Casual and registered rentals for one weather situation code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherTotals {
    pub weather_situation: u8,
    pub label: Option<String>,
    pub casual_total: u64,
    pub registered_total: u64,
}

/// One point of the daily trend series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub count: u64,
}
