//! Dashboard configuration.
//!
//! Stored as an optional JSON file on disk; every field has a default:
//! ```json
//! {
//!   "series": [
//!     { "key": "actual", "label": "Actual", "color": "#808080" },
//!     { "key": "prediction", "label": "Forecast", "color": "#ff4d4d" }
//!   ],
//!   "forecast_start_year": 2023,
//!   "top_routes": 5,
//!   "max_grid_columns": 4
//! }
//! ```

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_RIDERSHIP_URL: &str =
    "https://raw.githubusercontent.com/statzenthusiast921/amtrak_analysis/main/data/amtrak_preds_df.csv";
pub const DEFAULT_COORDINATES_URL: &str =
    "https://raw.githubusercontent.com/statzenthusiast921/amtrak_analysis/main/data/amtrak_df_v2.csv";

/// Colors handed out to series keys that have no configured color.
const PALETTE: &[&str] = &[
    "#636efa", "#00cc96", "#ab63fa", "#ffa15a", "#19d3f3", "#ff6692", "#b6e880",
];

/// Display settings for one raw series-key value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesKey {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub series: Vec<SeriesKey>,
    pub forecast_start_year: i32,
    pub top_routes: usize,
    pub max_grid_columns: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            series: vec![
                SeriesKey {
                    key: "actual".to_string(),
                    label: "Actual".to_string(),
                    color: Some("#808080".to_string()),
                },
                SeriesKey {
                    key: "prediction".to_string(),
                    label: "Forecast".to_string(),
                    color: Some("#ff4d4d".to_string()),
                },
            ],
            forecast_start_year: 2023,
            top_routes: 5,
            max_grid_columns: 4,
        }
    }
}

impl DashboardConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dashboard config '{path}'"))?;
        Self::from_json(&content).with_context(|| format!("invalid dashboard config '{path}'"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects counts the views cannot lay out.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.top_routes > 0, "top_routes must be at least 1");
        ensure!(self.max_grid_columns > 0, "max_grid_columns must be at least 1");
        Ok(())
    }

    /// Loads from `path` when given, otherwise falls back to the defaults.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn is_forecast_year(&self, year: i32) -> bool {
        year >= self.forecast_start_year
    }

    /// Human-readable label for a raw series key.
    pub fn series_label(&self, key: &str) -> String {
        self.series
            .iter()
            .find(|s| s.key == key)
            .map(|s| s.label.clone())
            .unwrap_or_else(|| capitalize(key))
    }

    /// Starts a color assignment scoped to one render call.
    pub fn series_colors(&self) -> SeriesColors<'_> {
        SeriesColors {
            config: self,
            assigned: HashMap::new(),
            next: 0,
        }
    }
}

/// Assigns one color per series key, stable for the lifetime of the value.
pub struct SeriesColors<'a> {
    config: &'a DashboardConfig,
    assigned: HashMap<String, String>,
    next: usize,
}

impl SeriesColors<'_> {
    pub fn color_for(&mut self, key: &str) -> String {
        if let Some(color) = self.assigned.get(key) {
            return color.clone();
        }

        let configured = self
            .config
            .series
            .iter()
            .find(|s| s.key == key)
            .and_then(|s| s.color.clone());

        let color = configured.unwrap_or_else(|| {
            let c = PALETTE[self.next % PALETTE.len()].to_string();
            self.next += 1;
            c
        });

        self.assigned.insert(key.to_string(), color.clone());
        color
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
