//! Station ridership for one route and year, as map markers and a ranking table.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::dataset::Dataset;
use crate::figure::{Figure, TEMPLATE};

const MAX_MARKER_SIZE: f64 = 40.0;

/// Rides summed per `(business_line, parent_route, station, year, lat, lon)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationYearRollup {
    pub business_line: String,
    pub parent_route: String,
    pub station_name: String,
    pub year: i32,
    pub lat: f64,
    pub lon: f64,
    pub rides: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingRow {
    pub station_name: String,
    pub rides: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteMap {
    pub business_line: String,
    pub parent_route: String,
    pub year: i32,
    /// Descending by rides, ties by station name. Map and table both read this.
    pub stations: Vec<StationYearRollup>,
}

impl RouteMap {
    /// Rows lacking coordinates cannot be placed and are left out of the rollup.
    pub fn compute(dataset: &Dataset, business_line: &str, parent_route: &str, year: i32) -> Self {
        let mut rollup: IndexMap<&str, StationYearRollup> = IndexMap::new();
        let mut unlocated = 0usize;

        for r in dataset.records().iter().filter(|r| {
            r.business_line == business_line && r.parent_route == parent_route && r.year == year
        }) {
            let Some((lat, lon)) = r.coordinates() else {
                unlocated += 1;
                continue;
            };

            rollup
                .entry(r.station_name.as_str())
                .or_insert_with(|| StationYearRollup {
                    business_line: r.business_line.clone(),
                    parent_route: r.parent_route.clone(),
                    station_name: r.station_name.clone(),
                    year,
                    lat,
                    lon,
                    rides: 0.0,
                })
                .rides += r.rides;
        }

        if unlocated > 0 {
            debug!(parent_route, year, unlocated, "Rows without coordinates left off the map");
        }

        let mut stations: Vec<StationYearRollup> = rollup.into_values().collect();
        stations.sort_by(|a, b| {
            b.rides
                .total_cmp(&a.rides)
                .then_with(|| a.station_name.cmp(&b.station_name))
        });

        Self {
            business_line: business_line.to_string(),
            parent_route: parent_route.to_string(),
            year,
            stations,
        }
    }

    pub fn ranking(&self) -> Vec<RankingRow> {
        self.stations
            .iter()
            .map(|s| RankingRow {
                station_name: s.station_name.clone(),
                rides: s.rides,
            })
            .collect()
    }

    /// One marker per station, sized and colored by rides.
    pub fn to_figure(&self) -> Figure {
        let max_rides = self
            .stations
            .iter()
            .map(|s| s.rides)
            .fold(0.0_f64, f64::max);

        let sizes: Vec<f64> = self
            .stations
            .iter()
            .map(|s| {
                if max_rides > 0.0 {
                    (s.rides / max_rides * MAX_MARKER_SIZE).max(4.0)
                } else {
                    4.0
                }
            })
            .collect();

        let trace = json!({
            "type": "scattergeo",
            "locationmode": "USA-states",
            "lat": self.stations.iter().map(|s| s.lat).collect::<Vec<_>>(),
            "lon": self.stations.iter().map(|s| s.lon).collect::<Vec<_>>(),
            "text": self.stations.iter().map(|s| s.station_name.as_str()).collect::<Vec<_>>(),
            "customdata": self.stations.iter().map(|s| s.rides).collect::<Vec<_>>(),
            "hovertemplate": "%{text}: %{customdata:,.0f}<extra></extra>",
            "marker": {
                "size": sizes,
                "color": self.stations.iter().map(|s| s.rides).collect::<Vec<_>>(),
                "colorscale": "Viridis",
                "showscale": true,
                "colorbar": { "title": { "text": "Rides" } },
            },
        });

        let layout = json!({
            "title": {
                "text": format!(
                    "Station Ridership on the {} parent route ({}) in {}",
                    self.parent_route, self.business_line, self.year
                )
            },
            "template": TEMPLATE,
            "geo": {
                "scope": "usa",
                "projection": { "type": "albers usa" },
                "showland": true,
            },
        });

        Figure::new(vec![trace], layout)
    }
}
