//! Monthly ridership of the busiest parent routes in one business line.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;

use crate::config::DashboardConfig;
use crate::dataset::Dataset;
use crate::figure::{Figure, TEMPLATE, month_axis};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthPoint {
    pub month: u32,
    pub rides: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSeries {
    pub parent_route: String,
    /// All-time total used for ranking.
    pub total_rides: f64,
    /// Months of the selected year that have data, in calendar order.
    pub points: Vec<MonthPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopRoutesMonthly {
    pub business_line: String,
    pub year: i32,
    pub limit: usize,
    pub forecast: bool,
    /// Ranked by descending total; ties keep the order of first appearance.
    pub routes: Vec<RouteSeries>,
}

/// Ranks the parent routes of `business_line` by total rides and keeps the first `limit`.
///
/// The sort is stable over first-appearance order, so equal totals rank by
/// which route shows up first in the dataset.
pub fn rank_parent_routes(dataset: &Dataset, business_line: &str, limit: usize) -> Vec<(String, f64)> {
    let mut totals: IndexMap<&str, f64> = IndexMap::new();
    for r in dataset
        .records()
        .iter()
        .filter(|r| r.business_line == business_line)
    {
        *totals.entry(r.parent_route.as_str()).or_default() += r.rides;
    }

    let mut ranked: Vec<(String, f64)> = totals
        .into_iter()
        .map(|(route, total)| (route.to_string(), total))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

impl TopRoutesMonthly {
    pub fn compute(
        dataset: &Dataset,
        config: &DashboardConfig,
        business_line: &str,
        year: i32,
    ) -> Self {
        let ranked = rank_parent_routes(dataset, business_line, config.top_routes);

        let mut monthly: IndexMap<&str, BTreeMap<u32, f64>> = ranked
            .iter()
            .map(|(route, _)| (route.as_str(), BTreeMap::new()))
            .collect();

        for r in dataset
            .records()
            .iter()
            .filter(|r| r.business_line == business_line && r.year == year)
        {
            if let Some(by_month) = monthly.get_mut(r.parent_route.as_str()) {
                *by_month.entry(r.month).or_default() += r.rides;
            }
        }

        let routes = ranked
            .iter()
            .map(|(route, total)| RouteSeries {
                parent_route: route.clone(),
                total_rides: *total,
                points: monthly
                    .get(route.as_str())
                    .map(|m| {
                        m.iter()
                            .map(|(&month, &rides)| MonthPoint { month, rides })
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect();

        Self {
            business_line: business_line.to_string(),
            year,
            limit: config.top_routes,
            forecast: config.is_forecast_year(year),
            routes,
        }
    }

    pub fn title(&self) -> String {
        let kind = if self.forecast { "Forecasts" } else { "Actuals" };
        format!(
            "Monthly Ridership {} for Top {} Parent Routes of the {} business line in {}",
            kind, self.limit, self.business_line, self.year
        )
    }

    /// One line per route; dashed when the year is in the forecast range.
    pub fn to_figure(&self) -> Figure {
        let dash = if self.forecast { "dash" } else { "solid" };

        let data = self
            .routes
            .iter()
            .filter(|r| !r.points.is_empty())
            .map(|r| {
                json!({
                    "type": "scatter",
                    "mode": "lines+markers",
                    "name": r.parent_route,
                    "legendgroup": r.parent_route,
                    "x": r.points.iter().map(|p| p.month).collect::<Vec<_>>(),
                    "y": r.points.iter().map(|p| p.rides).collect::<Vec<_>>(),
                    "line": { "dash": dash },
                    "customdata": vec![self.year; r.points.len()],
                    "hovertemplate": format!(
                        "Parent Route={}<br>Month=%{{x}}<br>Rides=%{{y:,.0f}}<br>Year=%{{customdata}}<extra></extra>",
                        r.parent_route
                    ),
                })
            })
            .collect();

        let layout = json!({
            "title": { "text": self.title() },
            "template": TEMPLATE,
            "xaxis": month_axis(),
            "yaxis": { "title": { "text": "Rides" } },
            "legend": { "title": { "text": "Parent Route" } },
        });

        Figure::new(data, layout)
    }
}
