//! HTTP surface: the dashboard page plus one JSON endpoint per view.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::net::SocketAddr;
use tracing::info;
use warp::{Filter, Rejection, Reply};

use crate::dashboard::SharedDashboard;
use crate::figure::Figure;
use crate::views::RankingRow;

const INDEX_HTML: &str = include_str!("../assets/index.html");

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub business_line: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BusinessLineQuery {
    pub business_line: String,
}

#[derive(Debug, Deserialize)]
pub struct TopRoutesQuery {
    pub business_line: String,
    pub year: i32,
}

#[derive(Debug, Deserialize)]
pub struct StationsQuery {
    pub parent_route: String,
}

#[derive(Debug, Deserialize)]
pub struct MapQuery {
    pub business_line: String,
    pub parent_route: String,
    pub year: i32,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub records: usize,
}

#[derive(Debug, Serialize)]
pub struct MapResponse {
    pub figure: Figure,
    pub table: Vec<RankingRow>,
}

/// Build the complete route tree.
pub fn routes(
    dashboard: SharedDashboard,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let api = warp::path("api");

    let index = warp::path::end()
        .and(warp::get())
        .map(|| warp::reply::html(INDEX_HTML));

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_dashboard(dashboard.clone()))
        .and_then(handle_health);

    let meta = api
        .and(warp::path("meta"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_dashboard(dashboard.clone()))
        .and_then(handle_meta);

    let summary = api
        .and(warp::path("summary"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<SummaryQuery>())
        .and(with_dashboard(dashboard.clone()))
        .and_then(handle_summary);

    let top_routes = api
        .and(warp::path("top-routes"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<TopRoutesQuery>())
        .and(with_dashboard(dashboard.clone()))
        .and_then(handle_top_routes);

    let parent_routes = api
        .and(warp::path("parent-routes"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<BusinessLineQuery>())
        .and(with_dashboard(dashboard.clone()))
        .and_then(handle_parent_routes);

    let stations = api
        .and(warp::path("stations"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<StationsQuery>())
        .and(with_dashboard(dashboard.clone()))
        .and_then(handle_stations);

    let map = api
        .and(warp::path("map"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<MapQuery>())
        .and(with_dashboard(dashboard))
        .and_then(handle_map);

    index
        .or(health)
        .or(meta)
        .or(summary)
        .or(top_routes)
        .or(parent_routes)
        .or(stations)
        .or(map)
        .with(warp::trace::request())
}

/// Serves the dashboard until the process is stopped.
pub async fn serve(dashboard: SharedDashboard, addr: SocketAddr) {
    info!(%addr, records = dashboard.dataset().len(), "Dashboard listening");
    warp::serve(routes(dashboard)).run(addr).await;
}

fn with_dashboard(
    dashboard: SharedDashboard,
) -> impl Filter<Extract = (SharedDashboard,), Error = Infallible> + Clone {
    warp::any().map(move || dashboard.clone())
}

async fn handle_health(dashboard: SharedDashboard) -> Result<impl Reply, Infallible> {
    Ok(warp::reply::json(&HealthResponse {
        status: "ok".to_string(),
        records: dashboard.dataset().len(),
    }))
}

async fn handle_meta(dashboard: SharedDashboard) -> Result<impl Reply, Infallible> {
    Ok(warp::reply::json(&dashboard.meta()))
}

async fn handle_summary(
    query: SummaryQuery,
    dashboard: SharedDashboard,
) -> Result<impl Reply, Infallible> {
    let table = dashboard.summary_table(query.business_line.as_deref());
    Ok(warp::reply::json(&table))
}

async fn handle_top_routes(
    query: TopRoutesQuery,
    dashboard: SharedDashboard,
) -> Result<impl Reply, Infallible> {
    let view = dashboard.top_routes(&query.business_line, query.year);
    Ok(warp::reply::json(&view.to_figure()))
}

async fn handle_parent_routes(
    query: BusinessLineQuery,
    dashboard: SharedDashboard,
) -> Result<impl Reply, Infallible> {
    Ok(warp::reply::json(&dashboard.route_choices(&query.business_line)))
}

async fn handle_stations(
    query: StationsQuery,
    dashboard: SharedDashboard,
) -> Result<impl Reply, Infallible> {
    let view = dashboard.station_detail(&query.parent_route);
    Ok(warp::reply::json(&view.to_figure(dashboard.config())))
}

async fn handle_map(query: MapQuery, dashboard: SharedDashboard) -> Result<impl Reply, Infallible> {
    let view = dashboard.route_map(&query.business_line, &query.parent_route, query.year);
    Ok(warp::reply::json(&MapResponse {
        figure: view.to_figure(),
        table: view.ranking(),
    }))
}
