//! CSV parsing for the ridership and station-coordinate sources.

use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::records::{RawCoordinateRow, RawRidershipRow, RidershipRecord};

/// Station name to `(lat, lon)`, as used by the left join.
pub type CoordinateIndex = HashMap<String, (Option<f64>, Option<f64>)>;

/// Decodes the ridership facts CSV.
///
/// # Errors
///
/// Returns an error naming the offending line if a row is malformed.
pub fn parse_ridership(bytes: &[u8]) -> Result<Vec<RawRidershipRow>> {
    let mut rdr = csv::Reader::from_reader(bytes);
    let mut rows = Vec::new();

    for (i, result) in rdr.deserialize().enumerate() {
        // +2: header line, 1-based numbering
        let row: RawRidershipRow =
            result.with_context(|| format!("invalid ridership row at line {}", i + 2))?;
        rows.push(row);
    }

    Ok(rows)
}

/// Decodes the coordinates CSV into a lookup keyed by station name.
///
/// Exact duplicate `(station, lat, lon)` rows collapse silently. A station
/// keeps its first row with both `lat` and `lon` present; rows with a blank
/// coordinate only count when no complete row exists.
pub fn parse_coordinates(bytes: &[u8]) -> Result<CoordinateIndex> {
    let mut rdr = csv::Reader::from_reader(bytes);
    let mut index = CoordinateIndex::new();

    for (i, result) in rdr.deserialize().enumerate() {
        let row: RawCoordinateRow =
            result.with_context(|| format!("invalid coordinate row at line {}", i + 2))?;

        let coords = (row.lat, row.lon);
        let complete = row.lat.is_some() && row.lon.is_some();

        match index.get(&row.station_name).copied() {
            None => {
                index.insert(row.station_name, coords);
            }
            Some(existing) if existing == coords => {}
            Some((Some(_), Some(_))) => {
                if complete {
                    warn!(station = %row.station_name, "Conflicting coordinates, keeping first");
                }
            }
            Some(_) => {
                if complete {
                    index.insert(row.station_name, coords);
                }
            }
        }
    }

    Ok(index)
}

/// Parses a month label into the calendar date it denotes.
pub fn parse_month(value: &str) -> Result<NaiveDate> {
    let value = value.trim();

    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(d);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d") {
        return Ok(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(value, "%m/%d/%Y") {
        return Ok(d);
    }

    Err(anyhow!("unrecognized month value '{value}'"))
}

/// Left-joins coordinates onto ridership rows and derives the date fields.
///
/// Rows without a coordinate match are kept with `lat`/`lon` of `None`.
pub fn join_records(
    rows: Vec<RawRidershipRow>,
    coordinates: &CoordinateIndex,
) -> Result<Vec<RidershipRecord>> {
    let mut unmatched = 0usize;
    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.into_iter().enumerate() {
        let month_date = parse_month(&row.month)
            .with_context(|| format!("invalid month on ridership row {}", i + 2))?;

        let (lat, lon) = match coordinates.get(&row.station_name) {
            Some(&coords) => coords,
            None => {
                unmatched += 1;
                (None, None)
            }
        };

        records.push(RidershipRecord {
            station_name: row.station_name,
            business_line: row.business_line,
            parent_route: row.parent_route,
            year: month_date.year(),
            month: month_date.month(),
            month_date,
            rides: row.rides.filter(|v| v.is_finite()).unwrap_or(0.0),
            key: row.key,
            lat,
            lon,
        });
    }

    debug!(records = records.len(), unmatched, "Coordinates joined");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RIDERSHIP: &str = "\
station_name,business_line,parent_route,.model_desc,.key,.index,.value
Boston,Northeast,Acela,ACTUAL,actual,2022-12-01,900
Boston,Northeast,Acela,ARIMA,prediction,2023-01-01,1000.5
Nowhere,Northeast,Acela,ARIMA,prediction,2023-01-01,
";

    const COORDS: &str = "\
station_name,lat,lon,state
Boston,42.35,-71.06,MA
Boston,42.35,-71.06,MA
Boston,40.00,-70.00,MA
";

    #[test]
    fn test_parse_ridership_renames_columns() {
        let rows = parse_ridership(RIDERSHIP.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].key, "prediction");
        assert_eq!(rows[1].month, "2023-01-01");
        assert_eq!(rows[1].rides, Some(1000.5));
        assert_eq!(rows[2].rides, None);
    }

    #[test]
    fn test_parse_ridership_missing_column_is_error() {
        let bad = "station_name,business_line\nBoston,Northeast\n";
        assert!(parse_ridership(bad.as_bytes()).is_err());
    }

    #[test]
    fn test_parse_coordinates_keeps_first_on_conflict() {
        let index = parse_coordinates(COORDS.as_bytes()).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index["Boston"], (Some(42.35), Some(-71.06)));
    }

    #[test]
    fn test_parse_coordinates_prefers_complete_row() {
        let csv = "\
station_name,lat,lon
Albany,,
Albany,42.64,-73.74
Albany,43.00,
";
        let index = parse_coordinates(csv.as_bytes()).unwrap();
        assert_eq!(index["Albany"], (Some(42.64), Some(-73.74)));
    }

    #[test]
    fn test_parse_coordinates_keeps_blank_when_nothing_better() {
        let csv = "station_name,lat,lon\nAlbany,,\n";
        let index = parse_coordinates(csv.as_bytes()).unwrap();
        assert_eq!(index["Albany"], (None, None));
    }

    #[test]
    fn test_join_treats_nan_rides_as_zero() {
        let csv = "\
station_name,business_line,parent_route,.key,.index,.value
Boston,Northeast,Acela,actual,2022-01-01,1000000
Boston,Northeast,Acela,actual,2022-02-01,NaN
Boston,Northeast,Acela,actual,2022-03-01,inf
";
        let rows = parse_ridership(csv.as_bytes()).unwrap();
        assert!(rows[1].rides.unwrap().is_nan());

        let records = join_records(rows, &CoordinateIndex::new()).unwrap();
        let rides: Vec<_> = records.iter().map(|r| r.rides).collect();
        assert_eq!(rides, vec![1_000_000.0, 0.0, 0.0]);
    }

    #[test]
    fn test_parse_month_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert_eq!(parse_month("2024-02-01").unwrap(), expected);
        assert_eq!(parse_month("2024-02-01 00:00:00").unwrap(), expected);
        assert_eq!(parse_month("2024-02").unwrap(), expected);
        assert_eq!(parse_month("02/01/2024").unwrap(), expected);
        assert!(parse_month("February").is_err());
    }

    #[test]
    fn test_join_keeps_unmatched_rows() {
        let rows = parse_ridership(RIDERSHIP.as_bytes()).unwrap();
        let index = parse_coordinates(COORDS.as_bytes()).unwrap();
        let records = join_records(rows, &index).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].coordinates(), Some((42.35, -71.06)));
        assert_eq!(records[0].year, 2022);
        assert_eq!(records[0].month, 12);
        assert_eq!(records[2].station_name, "Nowhere");
        assert_eq!(records[2].coordinates(), None);
        assert_eq!(records[2].rides, 0.0);
    }

    #[test]
    fn test_join_rejects_bad_month() {
        let csv = "\
station_name,business_line,parent_route,.key,.index,.value
Boston,Northeast,Acela,actual,sometime,1
";
        let rows = parse_ridership(csv.as_bytes()).unwrap();
        assert!(join_records(rows, &CoordinateIndex::new()).is_err());
    }
}
