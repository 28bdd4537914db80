//! The loaded, validated rental datasets and the date-range filter over them.
//!
//! [`RentalDataset`] is built once, either from CSV files with
//! [`RentalDataset::load`] or from in-memory records with
//! [`RentalDataset::from_records`], and is read-only afterwards.
//! [`RentalDataset::filter`] borrows it to produce a [`FilteredView`].

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;
use tracing::info;

use crate::analyzers::aggregate;
use crate::analyzers::types::{DailyPoint, HourlyProfile, SeasonProfile, WeatherTotals};
use crate::error::DashboardError;
use crate::labels::LabelConfig;
use crate::parser::{load_daily, load_hourly};
use crate::records::{DailyRecord, HourlyRecord};

/// A closed date interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidRange`] when `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DashboardError> {
        if start > end {
            return Err(DashboardError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone)]
pub struct RentalDataset {
    /// Sorted by date, dates unique.
    daily: Vec<DailyRecord>,
    hourly: Vec<HourlyRecord>,
    labels: LabelConfig,
}

impl RentalDataset {
    /// Reads and validates both CSV files.
    #[tracing::instrument(skip(labels))]
    pub fn load(day_path: &str, hour_path: &str, labels: LabelConfig) -> Result<Self, DashboardError> {
        let daily = load_daily(day_path, &labels)?;
        let hourly = load_hourly(hour_path)?;
        let dataset = Self {
            daily,
            hourly,
            labels,
        };
        dataset.log_summary();
        Ok(dataset)
    }

    /// Validates in-memory records and builds a dataset from them.
    ///
    /// Error line numbers are 1-based positions in the given vectors.
    pub fn from_records(
        mut daily: Vec<DailyRecord>,
        hourly: Vec<HourlyRecord>,
        labels: LabelConfig,
    ) -> Result<Self, DashboardError> {
        let mut seen = HashSet::new();
        for (i, r) in daily.iter().enumerate() {
            let line = i as u64 + 1;
            r.validate(&labels)
                .map_err(|msg| DashboardError::malformed("daily records", line, msg))?;
            if !seen.insert(r.date) {
                return Err(DashboardError::malformed(
                    "daily records",
                    line,
                    format!("date {} appears more than once", r.date),
                ));
            }
        }
        for (i, r) in hourly.iter().enumerate() {
            r.validate()
                .map_err(|msg| DashboardError::malformed("hourly records", i as u64 + 1, msg))?;
        }

        daily.sort_by_key(|r| r.date);
        Ok(Self {
            daily,
            hourly,
            labels,
        })
    }

    fn log_summary(&self) {
        match self.bounds() {
            Some(b) => info!(
                daily_rows = self.daily.len(),
                hourly_rows = self.hourly.len(),
                min_date = %b.start,
                max_date = %b.end,
                "Datasets loaded"
            ),
            None => info!(hourly_rows = self.hourly.len(), "Datasets loaded, daily data is empty"),
        }
    }

    pub fn daily(&self) -> &[DailyRecord] {
        &self.daily
    }

    pub fn hourly(&self) -> &[HourlyRecord] {
        &self.hourly
    }

    pub fn labels(&self) -> &LabelConfig {
        &self.labels
    }

    /// Earliest and latest daily dates, or `None` when no daily rows exist.
    pub fn bounds(&self) -> Option<DateRange> {
        let first = self.daily.first()?;
        let last = self.daily.last()?;
        Some(DateRange {
            start: first.date,
            end: last.date,
        })
    }

    /// Restricts the daily rows to `[start, end]`.
    ///
    /// A range that lies within the bounds but covers no rows yields an
    /// empty view.
    ///
    /// # Errors
    ///
    /// - [`DashboardError::InvalidRange`] if `start > end`
    /// - [`DashboardError::OutOfBounds`] if either end lies outside
    ///   [`bounds`](Self::bounds)
    /// - [`DashboardError::NoData`] if no daily rows are loaded
    pub fn filter(&self, start: NaiveDate, end: NaiveDate) -> Result<FilteredView<'_>, DashboardError> {
        let range = DateRange::new(start, end)?;
        let bounds = self.bounds().ok_or(DashboardError::NoData)?;
        if start < bounds.start || end > bounds.end {
            return Err(DashboardError::OutOfBounds {
                start,
                end,
                min: bounds.start,
                max: bounds.end,
            });
        }

        let lo = self.daily.partition_point(|r| r.date < start);
        let hi = self.daily.partition_point(|r| r.date <= end);
        Ok(FilteredView {
            range,
            rows: &self.daily[lo..hi],
            labels: &self.labels,
        })
    }

    /// A view over every daily row, or `None` when no daily rows exist.
    pub fn full_view(&self) -> Option<FilteredView<'_>> {
        let range = self.bounds()?;
        Some(FilteredView {
            range,
            rows: &self.daily,
            labels: &self.labels,
        })
    }

    /// Mean rentals per hour over the whole hourly dataset.
    pub fn hourly_profile(&self) -> HourlyProfile {
        aggregate::hourly_profile(&self.hourly)
    }
}

/// The daily rows falling inside one selected [`DateRange`].
#[derive(Debug, Clone, Copy)]
pub struct FilteredView<'a> {
    range: DateRange,
    rows: &'a [DailyRecord],
    labels: &'a LabelConfig,
}

impl<'a> FilteredView<'a> {
    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn rows(&self) -> &'a [DailyRecord] {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_count(&self) -> u64 {
        aggregate::total_count(self.rows)
    }

    /// # Errors
    ///
    /// Returns [`DashboardError::EmptyAggregation`] on an empty view.
    pub fn mean_count(&self) -> Result<f64, DashboardError> {
        aggregate::mean_count(self.rows)
    }

    pub fn season_profile(&self) -> SeasonProfile {
        aggregate::season_profile(self.rows, self.labels)
    }

    pub fn weather_split(&self) -> Vec<WeatherTotals> {
        aggregate::weather_split(self.rows, self.labels)
    }

    pub fn daily_trend(&self) -> Vec<DailyPoint> {
        aggregate::daily_trend(self.rows)
    }
}
