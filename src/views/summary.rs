//! Business line by year pivot, shown as the forecast summary table.

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::DashboardConfig;
use crate::dataset::Dataset;

pub const BUSINESS_LINE_COLUMN: &str = "Business Line";

/// One business line with a rounded total per year column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub business_line: String,
    /// Aligned with [`BusinessLineSummary::years`]; `None` where the line has no rows.
    pub totals: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessLineSummary {
    pub years: Vec<i32>,
    pub rows: Vec<SummaryRow>,
}

/// Column header metadata for the rendered table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryColumn {
    pub name: String,
    pub forecast: bool,
}

/// Display-ready table: formatted cells keyed by column name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTable {
    pub columns: Vec<SummaryColumn>,
    pub rows: Vec<IndexMap<String, String>>,
}

/// Formats a ride total as millions with two decimals, or `""` when absent.
pub fn format_millions(total: Option<f64>) -> String {
    match total {
        Some(x) if !x.is_nan() => format!("{:.2} M", x / 1e6),
        _ => String::new(),
    }
}

impl BusinessLineSummary {
    /// Sums rides per `(business_line, year)` and pivots years into columns.
    pub fn compute(dataset: &Dataset) -> Self {
        let mut sums: BTreeMap<&str, BTreeMap<i32, f64>> = BTreeMap::new();
        let mut years = BTreeSet::new();

        for r in dataset.records() {
            *sums
                .entry(r.business_line.as_str())
                .or_default()
                .entry(r.year)
                .or_default() += r.rides;
            years.insert(r.year);
        }

        let years: Vec<i32> = years.into_iter().collect();
        let rows = sums
            .into_iter()
            .map(|(bl, by_year)| SummaryRow {
                business_line: bl.to_string(),
                totals: years
                    .iter()
                    .map(|y| by_year.get(y).map(|v| v.round_ties_even()))
                    .collect(),
            })
            .collect();

        Self { years, rows }
    }

    /// Rows whose business line equals `business_line`.
    pub fn filter(&self, business_line: &str) -> Vec<&SummaryRow> {
        self.rows
            .iter()
            .filter(|r| r.business_line == business_line)
            .collect()
    }

    pub fn columns(&self, config: &DashboardConfig) -> Vec<SummaryColumn> {
        std::iter::once(SummaryColumn {
            name: BUSINESS_LINE_COLUMN.to_string(),
            forecast: false,
        })
        .chain(self.years.iter().map(|&y| SummaryColumn {
            name: y.to_string(),
            forecast: config.is_forecast_year(y),
        }))
        .collect()
    }

    /// Builds the display table, restricted to one business line when given.
    pub fn table(&self, config: &DashboardConfig, business_line: Option<&str>) -> SummaryTable {
        let rows = self
            .rows
            .iter()
            .filter(|r| business_line.is_none_or(|bl| r.business_line == bl))
            .map(|r| self.format_row(r))
            .collect();

        SummaryTable {
            columns: self.columns(config),
            rows,
        }
    }

    fn format_row(&self, row: &SummaryRow) -> IndexMap<String, String> {
        let mut cells = IndexMap::with_capacity(self.years.len() + 1);
        cells.insert(BUSINESS_LINE_COLUMN.to_string(), row.business_line.clone());
        for (year, total) in self.years.iter().zip(&row.totals) {
            cells.insert(year.to_string(), format_millions(*total));
        }
        cells
    }
}
