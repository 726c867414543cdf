//! Backend resource DTOs.
//!
//! These types map directly to the `data` payloads of the transit backend.
//! Entity IDs carry their table prefix (`route_id`, `station_id`, ...), and
//! schedules and delays arrive joined with route and station names. Columns
//! the backend leaves out of a particular query are `Option` or defaulted.

use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize};

/// A transit route.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Route {
    pub route_id: i64,

    #[serde(default)]
    pub route_name: String,

    /// "bus" or "train".
    #[serde(default)]
    pub route_type: String,

    pub operator: Option<String>,

    /// Name of the first stop, free text.
    #[serde(default)]
    pub start_station: String,

    /// Name of the last stop, free text.
    #[serde(default)]
    pub end_station: String,

    pub created_at: Option<String>,

    pub updated_at: Option<String>,
}

/// A stop or station.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Station {
    pub station_id: i64,

    #[serde(default)]
    pub station_name: String,

    /// "bus_stop" or "train_station".
    pub station_type: Option<String>,

    pub latitude: Option<f64>,

    pub longitude: Option<f64>,

    pub address: Option<String>,
}

/// A scheduled run of a route between two stations.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Schedule {
    pub schedule_id: i64,

    pub route_id: Option<i64>,

    #[serde(default)]
    pub route_name: String,

    /// Name of the departure station.
    #[serde(default)]
    pub departure_station: String,

    /// Name of the arrival station.
    #[serde(default)]
    pub arrival_station: String,

    /// Departure time as sent by the backend ("HH:MM" or "HH:MM:SS").
    pub departure_time: Option<String>,

    pub arrival_time: Option<String>,

    /// Day name, e.g. "Monday". Search results leave it out.
    pub day_of_week: Option<String>,

    /// Minutes between departures.
    pub frequency: Option<i64>,
}

impl Schedule {
    /// Parsed departure time, if present and well-formed.
    pub fn departure(&self) -> Option<NaiveTime> {
        self.departure_time.as_deref().and_then(parse_clock_time)
    }

    /// Parsed arrival time, if present and well-formed.
    pub fn arrival(&self) -> Option<NaiveTime> {
        self.arrival_time.as_deref().and_then(parse_clock_time)
    }
}

/// A delay report against a schedule.
///
/// The per-schedule listing omits `schedule_id`, `route_name` and
/// `departure_time`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Delay {
    pub delay_id: i64,

    pub schedule_id: Option<i64>,

    pub route_name: Option<String>,

    pub departure_time: Option<String>,

    #[serde(default)]
    pub delay_minutes: i64,

    pub reason: Option<String>,

    /// When the delay was reported (backend timestamp, verbatim).
    pub reported_at: Option<String>,

    /// Whether the delay is still in effect. The backend stores this as an
    /// integer column, so `1`/`0` are accepted alongside booleans.
    #[serde(default, deserialize_with = "flag")]
    pub is_active: Option<bool>,

    pub resolved_at: Option<String>,
}

/// Composite result of `/search`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SearchResults {
    #[serde(default)]
    pub routes: Vec<Route>,

    #[serde(default)]
    pub schedules: Vec<Schedule>,
}

impl SearchResults {
    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty() && self.schedules.is_empty()
    }
}

/// Which collections `/search` should look in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    All,
    Route,
    Schedule,
}

impl SearchType {
    /// Wire value of the `type` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            SearchType::All => "all",
            SearchType::Route => "route",
            SearchType::Schedule => "schedule",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `/health`. Unlike the resource endpoints it is not wrapped in a
/// `data` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: Option<String>,
}

impl HealthStatus {
    /// The literal status string the backend reports when healthy.
    pub const HEALTHY: &'static str = "healthy";

    pub fn is_healthy(&self) -> bool {
        self.status.as_deref() == Some(Self::HEALTHY)
    }
}

/// Acknowledgement of a create or update.
///
/// Creates answer with the new row's ID under its table-prefixed key and a
/// message; updates answer with the message only.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WriteAck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl WriteAck {
    /// ID of the created row, whichever resource it belongs to.
    pub fn id(&self) -> Option<i64> {
        self.route_id
            .or(self.station_id)
            .or(self.schedule_id)
            .or(self.delay_id)
    }
}

/// Payload for `POST /routes`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRoute {
    pub route_name: String,
    pub route_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    pub start_station: String,
    pub end_station: String,
}

/// Payload for `POST /stations`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewStation {
    pub station_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_type: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Payload for `POST /schedules`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSchedule {
    pub route_id: i64,
    pub departure_station_id: i64,
    pub arrival_station_id: i64,
    pub departure_time: String,
    pub arrival_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<i64>,
}

/// Payload for `POST /delays`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDelay {
    pub schedule_id: i64,
    pub delay_minutes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Payload for `PUT /delays/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DelayStatusUpdate {
    pub is_active: bool,
}

fn parse_clock_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

/// A boolean that may arrive as `true`/`false` or as an integer column.
fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Bool(b) => b,
        Raw::Int(n) => n != 0,
    }))
}
