//! Client for a public-transport tracking backend.
//!
//! Fetches routes, stations, schedules and delay reports from the tracking
//! service's REST API, submits new entries, and reports backend health for
//! the dashboard that displays them.

pub mod api;
pub mod dashboard;
pub mod http;
