//! Row types for the two CSV sources and the joined ridership record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single row of the ridership facts CSV, with the source's column labels.
#[derive(Debug, Deserialize)]
pub struct RawRidershipRow {
    pub(crate) station_name: String,
    pub(crate) business_line: String,
    pub(crate) parent_route: String,
    #[serde(rename = ".key")]
    pub(crate) key: String,
    #[serde(rename = ".index")]
    pub(crate) month: String,
    #[serde(rename = ".value")]
    pub(crate) rides: Option<f64>,
}

/// A single row of the station coordinates CSV.
#[derive(Debug, Deserialize)]
pub struct RawCoordinateRow {
    pub(crate) station_name: String,
    pub(crate) lat: Option<f64>,
    pub(crate) lon: Option<f64>,
}

/// One station/month/series observation after renaming and the coordinate join.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RidershipRecord {
    pub station_name: String,
    pub business_line: String,
    pub parent_route: String,
    pub month_date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub rides: f64,
    pub key: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl RidershipRecord {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.lat?, self.lon?))
    }
}
