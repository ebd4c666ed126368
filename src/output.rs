//! Output formatting and persistence for command-line view exports.
//!
//! Supports pretty-printing, JSON serialization, and CSV files.

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use std::fmt::Debug;
use std::fs::File;
use tracing::{debug, info};

use crate::views::SummaryTable;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Writes a value to stdout as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes serializable rows to a CSV file, replacing any existing file.
pub fn write_records<T: Serialize>(path: &str, records: &[T]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!(path, rows = records.len(), "CSV written");
    Ok(())
}

/// Writes the summary table with its display column names as the header.
pub fn write_summary(path: &str, table: &SummaryTable) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().from_writer(file);

    writer.write_record(table.columns.iter().map(|c| c.name.as_str()))?;
    for row in &table.rows {
        writer.write_record(
            table
                .columns
                .iter()
                .map(|c| row.get(&c.name).map(String::as_str).unwrap_or("")),
        )?;
    }
    writer.flush()?;

    info!(path, rows = table.rows.len(), "Summary CSV written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::dataset::fixtures::sample;
    use crate::views::{BusinessLineSummary, RankingRow};
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&sample());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        let summary = BusinessLineSummary::compute(&sample());
        print_json(&summary).unwrap();
    }

    #[test]
    fn test_write_records_header_and_rows() {
        let path = temp_path("amtrak_dashboard_test_ranking.csv");
        let _ = fs::remove_file(&path);

        let rows = vec![
            RankingRow {
                station_name: "New York".to_string(),
                rides: 800.0,
            },
            RankingRow {
                station_name: "Boston".to_string(),
                rides: 500.0,
            },
        ];
        write_records(&path, &rows).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines, vec!["station_name,rides", "New York,800.0", "Boston,500.0"]);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_records_replaces_existing_file() {
        let path = temp_path("amtrak_dashboard_test_replace.csv");
        let rows = vec![RankingRow {
            station_name: "Boston".to_string(),
            rides: 1.0,
        }];
        write_records(&path, &rows).unwrap();
        write_records(&path, &rows).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_summary() {
        let path = temp_path("amtrak_dashboard_test_summary.csv");
        let table = BusinessLineSummary::compute(&sample()).table(&DashboardConfig::default(), None);
        write_summary(&path, &table).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], "Business Line,2022,2023,2024");
        assert_eq!(lines[1], "Long Distance,,0.00 M,");
        assert_eq!(lines[2], "Northeast,0.00 M,,0.00 M");

        fs::remove_file(&path).unwrap();
    }
}
