//! The immutable ridership dataset, loaded once at startup.

use anyhow::Result;
use std::collections::BTreeSet;
use tracing::info;

use crate::fetch::{HttpClient, load_source};
use crate::parser::{join_records, parse_coordinates, parse_ridership};
use crate::records::RidershipRecord;

/// Locations of the two CSV sources (URLs or local paths).
#[derive(Debug, Clone)]
pub struct Sources {
    pub ridership: String,
    pub coordinates: String,
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<RidershipRecord>,
}

impl Dataset {
    pub fn new(records: Vec<RidershipRecord>) -> Self {
        Self { records }
    }

    /// Parses both sources and joins them into a dataset.
    pub fn from_csv(ridership: &[u8], coordinates: &[u8]) -> Result<Self> {
        let rows = parse_ridership(ridership)?;
        let index = parse_coordinates(coordinates)?;
        Ok(Self::new(join_records(rows, &index)?))
    }

    /// Fetches both sources and builds the dataset. Any failure is fatal to startup.
    #[tracing::instrument(skip_all, fields(ridership = %sources.ridership, coordinates = %sources.coordinates))]
    pub async fn load<C: HttpClient>(client: &C, sources: &Sources) -> Result<Self> {
        let ridership = load_source(client, &sources.ridership).await?;
        let coordinates = load_source(client, &sources.coordinates).await?;

        let dataset = Self::from_csv(&ridership, &coordinates)?;
        info!(
            records = dataset.len(),
            business_lines = dataset.business_lines().len(),
            "Dataset loaded"
        );
        Ok(dataset)
    }

    pub fn records(&self) -> &[RidershipRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct business lines.
    pub fn business_lines(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.business_line.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Sorted distinct parent routes belonging to `business_line`.
    pub fn parent_routes(&self, business_line: &str) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| r.business_line == business_line)
            .map(|r| r.parent_route.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn years(&self) -> Vec<i32> {
        self.records
            .iter()
            .map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// `(min, max)` year, or `None` for an empty dataset.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let min = self.records.iter().map(|r| r.year).min()?;
        let max = self.records.iter().map(|r| r.year).max()?;
        Some((min, max))
    }
}
