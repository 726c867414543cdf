use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use transit_client::api::TransitApi;
use transit_client::dashboard::{DEFAULT_POLL_INTERVAL, Dashboard, HealthMonitor, active_delays};
use transit_client::http::ClientConfig;

/// Page origin assumed when none is configured.
const DEFAULT_PAGE_ORIGIN: &str = "http://localhost";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Explicit base URL wins over detection from the page origin
    let config = match std::env::var("TRANSIT_API_URL") {
        Ok(url) => ClientConfig::new(url),
        Err(_) => {
            let origin = std::env::var("TRANSIT_PAGE_ORIGIN")
                .unwrap_or_else(|_| DEFAULT_PAGE_ORIGIN.to_string());
            ClientConfig::from_page_origin(&origin).expect("Invalid TRANSIT_PAGE_ORIGIN")
        }
    };

    let poll_interval = std::env::var("TRANSIT_HEALTH_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|&secs| secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_POLL_INTERVAL);

    let api = TransitApi::new(config).expect("Failed to create transit API client");
    info!(base_url = api.http().base_url(), "using transit backend");

    let dashboard = Dashboard::load(&api).await;
    if dashboard.is_empty() {
        warn!("backend returned no data; is it running?");
    }

    println!("Routes:    {}", dashboard.routes.len());
    println!("Stations:  {}", dashboard.stations.len());
    println!("Schedules: {}", dashboard.schedules.len());
    println!("Delays:    {} active", active_delays(&dashboard.delays).len());
    for delay in &dashboard.delays {
        println!(
            "  {} min on {}: {}",
            delay.delay_minutes,
            delay.route_name.as_deref().unwrap_or("unknown route"),
            delay.reason.as_deref().unwrap_or("no reason given"),
        );
    }

    // Poll health until interrupted
    let mut monitor = HealthMonitor::spawn(api, poll_interval);
    let mut last = None;
    while let Some(healthy) = monitor.next().await {
        if last != Some(healthy) {
            println!(
                "Backend status: {}",
                if healthy { "healthy" } else { "unavailable" }
            );
            last = Some(healthy);
        }
    }
}
