use crate::analyzers::types::{
    DailyPoint, HourlyMean, HourlyProfile, SeasonProfile, SeasonTotal, WeatherTotals,
};
use crate::analyzers::utility::{checked_mean, pct, round1};
use crate::error::DashboardError;
use crate::labels::LabelConfig;
use crate::records::{DailyRecord, HourlyRecord};
use std::collections::BTreeMap;

/// Sum of `count` over `rows`; 0 when empty.
pub fn total_count(rows: &[DailyRecord]) -> u64 {
    rows.iter().map(|r| r.count).sum()
}

/// Mean of `count` over `rows`, rounded to one decimal place.
///
/// # Errors
///
/// Returns [`DashboardError::EmptyAggregation`] when `rows` is empty.
pub fn mean_count(rows: &[DailyRecord]) -> Result<f64, DashboardError> {
    checked_mean(total_count(rows), rows.len())
        .map(round1)
        .ok_or(DashboardError::EmptyAggregation("mean count"))
}

/// Groups hourly records by hour and averages `count` per hour.
///
/// Peak and trough ties go to the earliest hour.
pub fn hourly_profile(records: &[HourlyRecord]) -> HourlyProfile {
    let mut by_hour: BTreeMap<u8, (u64, usize)> = BTreeMap::new();
    for r in records {
        let slot = by_hour.entry(r.hour).or_default();
        slot.0 += r.count;
        slot.1 += 1;
    }

    let hours: Vec<HourlyMean> = by_hour
        .into_iter()
        .filter_map(|(hour, (sum, n))| {
            checked_mean(sum, n).map(|mean_count| HourlyMean { hour, mean_count })
        })
        .collect();

    let mut peak: Option<HourlyMean> = None;
    let mut trough: Option<HourlyMean> = None;
    for h in &hours {
        if peak.is_none_or(|p| h.mean_count > p.mean_count) {
            peak = Some(*h);
        }
        if trough.is_none_or(|t| h.mean_count < t.mean_count) {
            trough = Some(*h);
        }
    }

    HourlyProfile {
        hours,
        peak,
        trough,
    }
}

/// Sums `count` per season label.
///
/// Codes that share a label are merged into one entry, placed where the
/// label first appears in the table and carrying that first code. Rows
/// whose code is missing from the table are skipped.
pub fn season_profile(rows: &[DailyRecord], labels: &LabelConfig) -> SeasonProfile {
    let mut by_code: BTreeMap<u8, u64> = BTreeMap::new();
    for r in rows {
        *by_code.entry(r.season).or_default() += r.count;
    }

    let mut slots: Vec<(SeasonTotal, bool)> = Vec::new();
    for entry in labels.seasons() {
        let total = by_code.get(&entry.code).copied();
        match slots.iter_mut().find(|(s, _)| s.label == entry.label) {
            Some((slot, present)) => {
                slot.total += total.unwrap_or(0);
                *present |= total.is_some();
            }
            None => slots.push((
                SeasonTotal {
                    code: entry.code,
                    label: entry.label.clone(),
                    total: total.unwrap_or(0),
                    share_percent: 0.0,
                },
                total.is_some(),
            )),
        }
    }

    let mut seasons: Vec<SeasonTotal> = slots
        .into_iter()
        .filter_map(|(s, present)| present.then_some(s))
        .collect();
    let grand_total: u64 = seasons.iter().map(|s| s.total).sum();
    for s in &mut seasons {
        s.share_percent = pct(s.total, grand_total);
    }

    // Table order is the tie-break, so only a strictly larger total wins.
    let mut dominant: Option<&SeasonTotal> = None;
    for s in &seasons {
        if dominant.is_none_or(|d| s.total > d.total) {
            dominant = Some(s);
        }
    }
    let dominant = dominant.map(|s| s.label.clone());

    SeasonProfile { seasons, dominant }
}

/// Sums casual and registered rentals per weather code, ordered by code.
pub fn weather_split(rows: &[DailyRecord], labels: &LabelConfig) -> Vec<WeatherTotals> {
    let mut by_code: BTreeMap<u8, (u64, u64)> = BTreeMap::new();
    for r in rows {
        let slot = by_code.entry(r.weather_situation).or_default();
        slot.0 += r.casual;
        slot.1 += r.registered;
    }

    by_code
        .into_iter()
        .map(|(code, (casual_total, registered_total))| WeatherTotals {
            weather_situation: code,
            label: labels.weather_label(code).map(str::to_string),
            casual_total,
            registered_total,
        })
        .collect()
}

/// The `(date, count)` series of `rows`, in the order given.
pub fn daily_trend(rows: &[DailyRecord]) -> Vec<DailyPoint> {
    rows.iter()
        .map(|r| DailyPoint {
            date: r.date,
            count: r.count,
        })
        .collect()
}
