//! Data side of the transit dashboard.
//!
//! Loads the lists the dashboard shows at startup and provides the
//! client-side filtering, form parsing and health polling the views use.
//! Rendering is left to the caller.

mod filter;
mod forms;
mod health;

pub use filter::{
    active_delays, filter_routes, filter_schedules, filter_schedules_by_day, filter_stations,
};
pub use forms::{FormError, ScheduleForm, StationForm, parse_coordinate};
pub use health::{DEFAULT_POLL_INTERVAL, HealthMonitor};

use tracing::info;

use crate::api::{Delay, Route, Schedule, Station, TransitApi, WriteAck};
use crate::http::ClientError;

/// Everything the dashboard shows on first load.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub routes: Vec<Route>,
    pub stations: Vec<Station>,
    pub schedules: Vec<Schedule>,
    /// Delay reports still in effect.
    pub delays: Vec<Delay>,
}

impl Dashboard {
    /// Fetch routes, stations, schedules and active delays concurrently.
    ///
    /// Returns once all four requests have settled. A failed fetch leaves
    /// its list empty and does not affect the others.
    pub async fn load(api: &TransitApi) -> Self {
        let (routes, stations, schedules, delays) = futures::join!(
            api.fetch_routes(),
            api.fetch_stations(),
            api.fetch_schedules(None, None),
            api.fetch_delays(Some(true), None),
        );

        info!(
            routes = routes.len(),
            stations = stations.len(),
            schedules = schedules.len(),
            delays = delays.len(),
            "dashboard loaded"
        );

        Self {
            routes,
            stations,
            schedules,
            delays,
        }
    }

    /// Re-fetch every list.
    pub async fn refresh(&mut self, api: &TransitApi) {
        *self = Self::load(api).await;
    }

    /// Whether the backend returned nothing at all.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
            && self.stations.is_empty()
            && self.schedules.is_empty()
            && self.delays.is_empty()
    }

    /// Name of the route with the given ID, if loaded.
    pub fn route_name(&self, route_id: i64) -> Option<&str> {
        self.routes
            .iter()
            .find(|r| r.route_id == route_id)
            .map(|r| r.route_name.as_str())
    }

    /// Name of the station with the given ID, if loaded.
    pub fn station_name(&self, station_id: i64) -> Option<&str> {
        self.stations
            .iter()
            .find(|s| s.station_id == station_id)
            .map(|s| s.station_name.as_str())
    }

    /// Active delays on one route. Empty on failure.
    pub async fn route_delays(api: &TransitApi, route_id: i64) -> Vec<Delay> {
        api.fetch_delays(Some(true), Some(route_id)).await
    }

    /// Mark a delay resolved, then reload the active delays.
    ///
    /// On failure the loaded delays are left as they were.
    pub async fn resolve_delay(
        &mut self,
        api: &TransitApi,
        delay_id: i64,
    ) -> Result<WriteAck, ClientError> {
        let ack = api.update_delay_status(delay_id, false).await?;
        info!(delay_id, "delay resolved");
        self.delays = api.fetch_delays(Some(true), None).await;
        Ok(ack)
    }
}
