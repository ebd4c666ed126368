use amtrak_dashboard::config::DashboardConfig;
use amtrak_dashboard::dashboard::Dashboard;
use amtrak_dashboard::dataset::Dataset;
use amtrak_dashboard::interaction::Selection;
use std::collections::BTreeSet;

fn load_fixture() -> Dataset {
    let ridership = include_bytes!("fixtures/ridership.csv");
    let coordinates = include_bytes!("fixtures/coordinates.csv");
    Dataset::from_csv(ridership, coordinates).expect("Failed to load fixtures")
}

fn dashboard() -> Dashboard {
    Dashboard::new(load_fixture(), DashboardConfig::default())
}

#[test]
fn test_full_pipeline() {
    let dataset = load_fixture();

    assert_eq!(dataset.len(), 121);
    assert_eq!(
        dataset.business_lines(),
        vec!["Long Distance", "Northeast", "State Supported"]
    );
    assert_eq!(dataset.year_range(), Some((2022, 2023)));
}

#[test]
fn test_unmatched_stations_keep_their_rows() {
    let dataset = load_fixture();

    let ghost: Vec<_> = dataset
        .records()
        .iter()
        .filter(|r| r.station_name == "Ghost Town")
        .collect();
    assert_eq!(ghost.len(), 1);
    assert_eq!(ghost[0].lat, None);
    assert_eq!(ghost[0].rides, 0.0);
}

#[test]
fn test_summary_one_row_per_business_line() {
    let dashboard = dashboard();
    for bl in dashboard.dataset().business_lines() {
        let table = dashboard.summary_table(Some(&bl));
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0]["Business Line"], bl);
        assert!(table.rows[0]["2022"].ends_with(" M"));
    }
}

#[test]
fn test_top_routes_excludes_smallest_route() {
    let view = dashboard().top_routes("Northeast", 2022);
    let routes: Vec<_> = view.routes.iter().map(|r| r.parent_route.as_str()).collect();

    assert_eq!(
        routes,
        vec!["Northeast Regional", "Acela", "Keystone", "Empire Service", "Downeaster"]
    );
    assert!(!view.forecast);
    for route in &view.routes {
        let months: Vec<_> = route.points.iter().map(|p| p.month).collect();
        assert_eq!(months, vec![1, 2, 3]);
    }
}

#[test]
fn test_forecast_year_switches_style() {
    let fig = dashboard().top_routes("Northeast", 2023).to_figure();
    assert!(
        fig.layout["title"]["text"]
            .as_str()
            .unwrap()
            .contains("Forecasts")
    );
    assert!(fig.data.iter().all(|t| t["line"]["dash"] == "dash"));
}

#[test]
fn test_station_grid_for_route() {
    let view = dashboard().station_detail("Northeast Regional");

    assert_eq!(view.stations.len(), 5);
    assert_eq!((view.grid.rows, view.grid.columns), (3, 2));

    let labels: BTreeSet<_> = view.stations[0]
        .series
        .iter()
        .map(|s| s.label.as_str())
        .collect();
    assert_eq!(labels, BTreeSet::from(["Actual", "Forecast"]));
}

#[test]
fn test_cascading_selection_drives_map() {
    let dashboard = dashboard();
    let mut selection = Selection::initial(dashboard.dataset());

    let choices = selection.select_business_line(dashboard.dataset(), "State Supported");
    assert_eq!(choices.options, vec!["Pacific Surfliner"]);
    selection.year = Some(2023);

    let map = dashboard.route_map(
        selection.business_line.as_deref().unwrap(),
        selection.parent_route.as_deref().unwrap(),
        selection.year.unwrap(),
    );
    let stations: Vec<_> = map.ranking().into_iter().map(|r| r.station_name).collect();

    // Solana Beach has no coordinates
    assert_eq!(stations, vec!["San Diego", "Los Angeles"]);
}

#[test]
fn test_stale_route_selection_gives_empty_map() {
    let dashboard = dashboard();
    let map = dashboard.route_map("State Supported", "Acela", 2023);
    assert!(map.stations.is_empty());
    assert!(map.ranking().is_empty());
}
