//! Aggregation views over the ridership dataset.
//!
//! Every view is a pure function of the immutable [`Dataset`](crate::dataset::Dataset)
//! and a filter selection, and knows how to turn itself into a table or a
//! Plotly [`Figure`](crate::figure::Figure).

pub mod route_map;
pub mod station_detail;
pub mod summary;
pub mod top_routes;

pub use route_map::{RankingRow, RouteMap, StationYearRollup};
pub use station_detail::{GridShape, StationDetail, grid_shape};
pub use summary::{BusinessLineSummary, SummaryTable, format_millions};
pub use top_routes::{TopRoutesMonthly, rank_parent_routes};
