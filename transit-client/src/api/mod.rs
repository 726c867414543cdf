//! Transit backend resources.
//!
//! Typed accessors for routes, stations, schedules, delay reports, search
//! and health, built on the generic [`crate::http`] client.
//!
//! List accessors return an empty collection on any failure; single-entity
//! reads and writes return [`ClientError`](crate::http::ClientError); writes
//! succeed with the backend's [`WriteAck`].

mod client;
mod types;


pub use client::{TransitApi, delays_path, schedules_path, search_path};
pub use types::{
    Delay, DelayStatusUpdate, HealthStatus, NewDelay, NewRoute, NewSchedule, NewStation, Route,
    Schedule, SearchResults, SearchType, Station, WriteAck,
};
