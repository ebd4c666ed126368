//! Per-station actual vs forecast small multiples for one parent route.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;

use crate::config::DashboardConfig;
use crate::dataset::Dataset;
use crate::figure::{Figure, TEMPLATE, axis_suffix};

const PANEL_HEIGHT: usize = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridShape {
    pub rows: usize,
    pub columns: usize,
}

/// Grid for `count` panels: `min(max_columns, floor(sqrt(count)))` columns and
/// as many rows as needed. Zero panels give a `0 x 0` grid. A `max_columns`
/// of zero is treated as one.
pub fn grid_shape(count: usize, max_columns: usize) -> GridShape {
    let columns = max_columns.max(1).min(count.isqrt());
    if columns == 0 {
        return GridShape { rows: 0, columns: 0 };
    }
    GridShape {
        rows: count.div_ceil(columns),
        columns,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub month_date: NaiveDate,
    pub rides: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationSeries {
    pub key: String,
    pub label: String,
    /// Ordered by month.
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationPanel {
    pub station_name: String,
    pub series: Vec<StationSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationDetail {
    pub parent_route: String,
    pub grid: GridShape,
    /// Sorted by station name; panel `i` sits at row `i / columns`, column `i % columns`.
    pub stations: Vec<StationPanel>,
}

impl StationDetail {
    /// Sums rides per `(station, month, key)` for the stations on `parent_route`.
    pub fn compute(dataset: &Dataset, config: &DashboardConfig, parent_route: &str) -> Self {
        let mut grouped: BTreeMap<&str, BTreeMap<&str, BTreeMap<NaiveDate, f64>>> = BTreeMap::new();

        for r in dataset
            .records()
            .iter()
            .filter(|r| r.parent_route == parent_route)
        {
            *grouped
                .entry(r.station_name.as_str())
                .or_default()
                .entry(r.key.as_str())
                .or_default()
                .entry(r.month_date)
                .or_default() += r.rides;
        }

        let stations: Vec<StationPanel> = grouped
            .into_iter()
            .map(|(station, by_key)| StationPanel {
                station_name: station.to_string(),
                series: by_key
                    .into_iter()
                    .map(|(key, points)| StationSeries {
                        key: key.to_string(),
                        label: config.series_label(key),
                        points: points
                            .into_iter()
                            .map(|(month_date, rides)| SeriesPoint { month_date, rides })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            parent_route: parent_route.to_string(),
            grid: grid_shape(stations.len(), config.max_grid_columns),
            stations,
        }
    }

    pub fn to_figure(&self, config: &DashboardConfig) -> Figure {
        let mut colors = config.series_colors();
        let mut legend_shown: Vec<&str> = Vec::new();
        let mut data = Vec::new();
        let mut annotations = Vec::new();

        let GridShape { rows, columns } = self.grid;

        for (i, panel) in self.stations.iter().enumerate() {
            let suffix = axis_suffix(i);

            for series in &panel.series {
                let first = !legend_shown.contains(&series.key.as_str());
                if first {
                    legend_shown.push(&series.key);
                }

                data.push(json!({
                    "type": "scatter",
                    "mode": "lines",
                    "name": series.label,
                    "legendgroup": series.key,
                    "showlegend": first,
                    "xaxis": format!("x{suffix}"),
                    "yaxis": format!("y{suffix}"),
                    "x": series.points.iter().map(|p| p.month_date.format("%Y-%m-%d").to_string()).collect::<Vec<_>>(),
                    "y": series.points.iter().map(|p| p.rides).collect::<Vec<_>>(),
                    "line": { "color": colors.color_for(&series.key) },
                }));
            }

            let (row, col) = (i / columns, i % columns);
            annotations.push(json!({
                "text": panel.station_name,
                "showarrow": false,
                "xref": "paper",
                "yref": "paper",
                "x": (col as f64 + 0.5) / columns as f64,
                "y": 1.0 - row as f64 / rows as f64,
                "xanchor": "center",
                "yanchor": "bottom",
            }));
        }

        let mut layout = json!({
            "title": { "text": format!("Station Ridership for the {} parent route", self.parent_route) },
            "template": TEMPLATE,
            "height": (rows.max(1)) * PANEL_HEIGHT,
            "annotations": annotations,
            "legend": { "title": { "text": "Series" } },
        });
        if rows > 0 {
            layout["grid"] = json!({
                "rows": rows,
                "columns": columns,
                "pattern": "independent",
                "roworder": "top to bottom",
            });
        }

        Figure::new(data, layout)
    }
}
