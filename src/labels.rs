//! Code-to-label lookup tables for seasons and weather situations.
//!
//! Stored as a plain JSON object on disk:
//! ```json
//! {
//!   "seasons": [
//!     { "code": 1, "label": "Spring" },
//!     { "code": 2, "label": "Summer" }
//!   ],
//!   "weather": [
//!     { "code": 1, "label": "Clear" }
//!   ]
//! }
//! ```
//!
//! Season entries are ordered; that order breaks ties when picking the
//! dominant season. Several codes may share one label and are then
//! reported as a single season.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::DashboardError;

/// One `(code, label)` pair from a lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEntry {
    pub code: u8,
    pub label: String,
}

impl LabelEntry {
    fn new(code: u8, label: &str) -> Self {
        Self {
            code,
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelConfig {
    seasons: Vec<LabelEntry>,
    #[serde(default)]
    weather: Vec<LabelEntry>,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            seasons: vec![
                LabelEntry::new(1, "Spring"),
                LabelEntry::new(2, "Summer"),
                LabelEntry::new(3, "Fall"),
                LabelEntry::new(4, "Winter"),
            ],
            weather: vec![
                LabelEntry::new(1, "Clear"),
                LabelEntry::new(2, "Mist"),
                LabelEntry::new(3, "Light Snow/Rain"),
                LabelEntry::new(4, "Heavy Rain"),
            ],
        }
    }
}

impl LabelConfig {
    /// Loads the tables from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self, DashboardError> {
        let content = std::fs::read_to_string(path).map_err(|source| DashboardError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, DashboardError> {
        let config: LabelConfig = serde_json::from_str(content)
            .map_err(|e| DashboardError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), DashboardError> {
        if self.seasons.is_empty() {
            return Err(DashboardError::Config(
                "at least one season label is required".to_string(),
            ));
        }
        check_unique("season", &self.seasons)?;
        check_unique("weather", &self.weather)?;
        if self.weather.iter().any(|e| e.code == 0) {
            return Err(DashboardError::Config(
                "weather code 0 is reserved".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the label configured for a season code.
    pub fn season_label(&self, code: u8) -> Option<&str> {
        self.seasons
            .iter()
            .find(|e| e.code == code)
            .map(|e| e.label.as_str())
    }

    /// Iterates over season entries in declaration order.
    pub fn seasons(&self) -> impl Iterator<Item = &LabelEntry> {
        self.seasons.iter()
    }

    /// Weather labels are optional; unknown codes are still aggregated.
    pub fn weather_label(&self, code: u8) -> Option<&str> {
        self.weather
            .iter()
            .find(|e| e.code == code)
            .map(|e| e.label.as_str())
    }
}

fn check_unique(kind: &str, entries: &[LabelEntry]) -> Result<(), DashboardError> {
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.code) {
            return Err(DashboardError::Config(format!(
                "duplicate {kind} code {}",
                entry.code
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables() {
        let labels = LabelConfig::default();
        assert_eq!(labels.season_label(1), Some("Spring"));
        assert_eq!(labels.season_label(4), Some("Winter"));
        assert_eq!(labels.season_label(5), None);
        assert_eq!(labels.weather_label(2), Some("Mist"));
    }

    #[test]
    fn test_from_json_keeps_declaration_order() {
        let json = r#"{
            "seasons": [
                { "code": 4, "label": "Musim Dingin" },
                { "code": 1, "label": "Musim Semi" }
            ]
        }"#;
        let labels = LabelConfig::from_json(json).unwrap();
        let codes: Vec<u8> = labels.seasons().map(|e| e.code).collect();
        assert_eq!(codes, vec![4, 1]);
        assert_eq!(labels.weather_label(1), None);
    }

    #[test]
    fn test_duplicate_season_code_rejected() {
        let result = LabelConfig::from_json(
            r#"{ "seasons": [
                { "code": 1, "label": "Spring" },
                { "code": 1, "label": "Again" }
            ] }"#,
        );
        assert!(matches!(result, Err(DashboardError::Config(_))));
    }

    #[test]
    fn test_empty_season_table_rejected() {
        let result = LabelConfig::from_json(r#"{ "seasons": [] }"#);
        assert!(matches!(result, Err(DashboardError::Config(_))));
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let result = LabelConfig::from_json("{ not json");
        assert!(matches!(result, Err(DashboardError::Config(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = LabelConfig::load("/nonexistent/labels.json");
        assert!(matches!(result, Err(DashboardError::Io { .. })));
    }
}
