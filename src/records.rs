//! Row types for the daily and hourly rental datasets.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::labels::LabelConfig;

/// Largest per-row rental count accepted on load. Keeps every sum over a
/// loaded dataset within `u64`.
pub const MAX_COUNT: u64 = u32::MAX as u64;

/// One row of the daily dataset, keyed by `date`.
///
/// Column names follow the public bike-sharing dataset (`dteday`, `cnt`,
/// `weathersit`); columns not listed here are ignored on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    #[serde(rename = "dteday")]
    pub date: NaiveDate,
    #[serde(rename = "cnt")]
    pub count: u64,
    pub casual: u64,
    pub registered: u64,
    pub season: u8,
    #[serde(rename = "weathersit")]
    pub weather_situation: u8,
}

/// One row of the hourly dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyRecord {
    #[serde(rename = "dteday")]
    pub date: NaiveDate,
    #[serde(rename = "hr")]
    pub hour: u8,
    #[serde(rename = "cnt")]
    pub count: u64,
}

impl DailyRecord {
    /// Checks the row-level invariants that typed deserialization cannot.
    pub fn validate(&self, labels: &LabelConfig) -> Result<(), String> {
        if labels.season_label(self.season).is_none() {
            return Err(format!("season code {} is not configured", self.season));
        }
        if self.count > MAX_COUNT {
            return Err(format!("count {} exceeds the limit of {MAX_COUNT}", self.count));
        }
        if self.weather_situation == 0 {
            return Err("weather situation code must be positive".to_string());
        }
        match self.casual.checked_add(self.registered) {
            Some(sum) if sum == self.count => Ok(()),
            _ => Err(format!(
                "casual ({}) + registered ({}) does not equal count ({})",
                self.casual, self.registered, self.count
            )),
        }
    }
}

impl HourlyRecord {
    pub fn validate(&self) -> Result<(), String> {
        if self.hour > 23 {
            return Err(format!("hour {} is outside 0-23", self.hour));
        }
        if self.count > MAX_COUNT {
            return Err(format!("count {} exceeds the limit of {MAX_COUNT}", self.count));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daily(count: u64, casual: u64, registered: u64, season: u8, weather: u8) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            count,
            casual,
            registered,
            season,
            weather_situation: weather,
        }
    }

    #[test]
    fn test_valid_daily_record() {
        let labels = LabelConfig::default();
        assert!(daily(10, 3, 7, 1, 1).validate(&labels).is_ok());
    }

    #[test]
    fn test_count_mismatch_rejected() {
        let labels = LabelConfig::default();
        let err = daily(11, 3, 7, 1, 1).validate(&labels).unwrap_err();
        assert!(err.contains("does not equal count"));
    }

    #[test]
    fn test_unknown_season_rejected() {
        let labels = LabelConfig::default();
        let err = daily(10, 3, 7, 5, 1).validate(&labels).unwrap_err();
        assert!(err.contains("season code 5"));
    }

    #[test]
    fn test_zero_weather_rejected() {
        let labels = LabelConfig::default();
        assert!(daily(10, 3, 7, 1, 0).validate(&labels).is_err());
    }

    #[test]
    fn test_overflowing_components_rejected() {
        let labels = LabelConfig::default();
        assert!(daily(u64::MAX, u64::MAX, 1, 1, 1).validate(&labels).is_err());
    }

    #[test]
    fn test_count_limit() {
        let labels = LabelConfig::default();
        assert!(daily(MAX_COUNT, 0, MAX_COUNT, 1, 1).validate(&labels).is_ok());
        let err = daily(MAX_COUNT + 1, 1, MAX_COUNT, 1, 1)
            .validate(&labels)
            .unwrap_err();
        assert!(err.contains("exceeds the limit"));

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let hourly = HourlyRecord {
            date,
            hour: 0,
            count: MAX_COUNT + 1,
        };
        assert!(hourly.validate().is_err());
    }

    #[test]
    fn test_hour_bounds() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let ok = HourlyRecord { date, hour: 23, count: 1 };
        let bad = HourlyRecord { date, hour: 24, count: 1 };
        assert!(ok.validate().is_ok());
        assert!(bad.validate().is_err());
    }
}
