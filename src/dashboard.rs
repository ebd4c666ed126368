//! Process-wide dashboard state: the loaded dataset, its configuration, and
//! the business-line summary computed once at startup.

use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::config::DashboardConfig;
use crate::dataset::Dataset;
use crate::interaction::{RouteChoices, Selection, route_choices};
use crate::views::{BusinessLineSummary, RouteMap, StationDetail, SummaryTable, TopRoutesMonthly};

pub type SharedDashboard = Arc<Dashboard>;

/// Values the page needs to build its selectors.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardMeta {
    pub business_lines: Vec<String>,
    pub years: Vec<i32>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub forecast_start_year: i32,
    pub initial: Selection,
}

pub struct Dashboard {
    dataset: Dataset,
    config: DashboardConfig,
    summary: BusinessLineSummary,
}

impl Dashboard {
    pub fn new(dataset: Dataset, config: DashboardConfig) -> Self {
        let summary = BusinessLineSummary::compute(&dataset);
        Self {
            dataset,
            config,
            summary,
        }
    }

    pub fn shared(self) -> SharedDashboard {
        Arc::new(self)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn meta(&self) -> DashboardMeta {
        let range = self.dataset.year_range();
        DashboardMeta {
            business_lines: self.dataset.business_lines(),
            years: self.dataset.years(),
            min_year: range.map(|(min, _)| min),
            max_year: range.map(|(_, max)| max),
            forecast_start_year: self.config.forecast_start_year,
            initial: Selection::initial(&self.dataset),
        }
    }

    pub fn summary_table(&self, business_line: Option<&str>) -> SummaryTable {
        let table = self.summary.table(&self.config, business_line);
        debug!(business_line, rows = table.rows.len(), "Summary table");
        table
    }

    pub fn top_routes(&self, business_line: &str, year: i32) -> TopRoutesMonthly {
        let view = TopRoutesMonthly::compute(&self.dataset, &self.config, business_line, year);
        debug!(business_line, year, routes = view.routes.len(), "Top routes");
        view
    }

    pub fn route_choices(&self, business_line: &str) -> RouteChoices {
        route_choices(&self.dataset, business_line)
    }

    pub fn station_detail(&self, parent_route: &str) -> StationDetail {
        let view = StationDetail::compute(&self.dataset, &self.config, parent_route);
        debug!(parent_route, stations = view.stations.len(), "Station detail");
        view
    }

    pub fn route_map(&self, business_line: &str, parent_route: &str, year: i32) -> RouteMap {
        let view = RouteMap::compute(&self.dataset, business_line, parent_route, year);
        debug!(business_line, parent_route, year, stations = view.stations.len(), "Route map");
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::sample;

    #[test]
    fn test_meta_reflects_dataset() {
        let dashboard = Dashboard::new(sample(), DashboardConfig::default());
        let meta = dashboard.meta();

        assert_eq!(meta.business_lines, vec!["Long Distance", "Northeast"]);
        assert_eq!(meta.min_year, Some(2022));
        assert_eq!(meta.max_year, Some(2024));
        assert_eq!(meta.forecast_start_year, 2023);
        assert_eq!(meta.initial.parent_route.as_deref(), Some("Cardinal"));
    }

    #[test]
    fn test_empty_dataset_views_are_empty() {
        let dashboard = Dashboard::new(Dataset::default(), DashboardConfig::default());

        assert!(dashboard.summary_table(None).rows.is_empty());
        assert!(dashboard.top_routes("Northeast", 2023).routes.is_empty());
        assert!(dashboard.station_detail("Acela").stations.is_empty());
        assert!(dashboard.route_map("Northeast", "Acela", 2023).stations.is_empty());
        assert!(dashboard.route_choices("Northeast").options.is_empty());
    }
}
