use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::analyzers::types::{DailyPoint, HourlyProfile, SeasonProfile, WeatherTotals};
use crate::dataset::{DateRange, FilteredView, RentalDataset};
use crate::error::DashboardError;

/// Every summary the dashboard shows for one selected date range.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub generated_at: DateTime<Utc>,
    pub range: DateRange,
    pub days: usize,

    // scalar metrics
    pub total_count: u64,
    pub mean_count: Option<f64>,

    // chart series
    pub daily_trend: Vec<DailyPoint>,
    pub hourly: HourlyProfile,
    pub seasons: SeasonProfile,
    pub weather: Vec<WeatherTotals>,

    /// Sections that could not be computed, one message each.
    pub warnings: Vec<String>,
}

impl DashboardStats {
    /// Filters `dataset` to the requested range and computes every section.
    ///
    /// A missing `start` or `end` defaults to the matching dataset bound.
    ///
    /// # Errors
    ///
    /// Fails only when the range itself is rejected; a section that cannot
    /// be computed is recorded in `warnings` instead.
    #[tracing::instrument(skip(dataset))]
    pub fn build(
        dataset: &RentalDataset,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self, DashboardError> {
        let range = resolve_range(dataset, start, end)?;
        let view = dataset.filter(range.start, range.end)?;
        let stats = Self::from_view(&view, dataset.hourly_profile());

        info!(
            days = stats.days,
            total_count = stats.total_count,
            warnings = stats.warnings.len(),
            "Dashboard stats computed"
        );
        Ok(stats)
    }

    /// Computes the date-filtered sections from `view`; `hourly` is taken
    /// as-is since it ignores the date filter.
    pub fn from_view(view: &FilteredView<'_>, hourly: HourlyProfile) -> Self {
        let mut warnings = Vec::new();

        let mean_count = match view.mean_count() {
            Ok(mean) => Some(mean),
            Err(e) => {
                warn!(error = %e, "Mean count unavailable");
                warnings.push(e.to_string());
                None
            }
        };

        if hourly.hours.is_empty() {
            warnings.push("hourly profile is empty: no hourly records loaded".to_string());
        }

        DashboardStats {
            generated_at: Utc::now(),
            range: view.range(),
            days: view.len(),
            total_count: view.total_count(),
            mean_count,
            daily_trend: view.daily_trend(),
            hourly,
            seasons: view.season_profile(),
            weather: view.weather_split(),
            warnings,
        }
    }
}

/// Fills a missing `start` or `end` from the dataset bounds.
pub fn resolve_range(
    dataset: &RentalDataset,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<DateRange, DashboardError> {
    match (start, end) {
        (Some(start), Some(end)) => DateRange::new(start, end),
        _ => {
            let bounds = dataset.bounds().ok_or(DashboardError::NoData)?;
            DateRange::new(start.unwrap_or(bounds.start), end.unwrap_or(bounds.end))
        }
    }
}
