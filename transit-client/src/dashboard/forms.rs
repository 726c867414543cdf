//! Parsing of create-form input into request payloads.

use crate::api::{NewSchedule, NewStation};

/// Errors from form input that cannot become a payload.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    /// A required field was blank
    #[error("{0} is required")]
    Missing(&'static str),

    /// A coordinate was not a finite number
    #[error("invalid coordinate {0:?}")]
    InvalidCoordinate(String),

    /// A coordinate was outside its valid range
    #[error("coordinate {value} out of range for {field}")]
    OutOfRange { field: &'static str, value: f64 },

    /// An ID field was not a positive integer
    #[error("please enter a valid {field}, got {value:?}")]
    InvalidId { field: &'static str, value: String },
}

/// Parse a latitude/longitude input field.
///
/// Blank input means "not given" and yields `None`. Any finite number,
/// including `0`, is kept.
pub fn parse_coordinate(input: &str) -> Result<Option<f64>, FormError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    match input.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(FormError::InvalidCoordinate(input.to_string())),
    }
}

/// Raw station form fields, as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct StationForm {
    pub station_name: String,
    /// "bus_stop" or "train_station"; blank to leave unset.
    pub station_type: String,
    pub address: String,
    pub latitude: String,
    pub longitude: String,
}

impl NewStation {
    /// Build a station payload from form input.
    ///
    /// Blank optional fields are omitted; coordinates go through
    /// [`parse_coordinate`] and are range-checked.
    pub fn from_form(form: &StationForm) -> Result<Self, FormError> {
        let name = form.station_name.trim();
        if name.is_empty() {
            return Err(FormError::Missing("station_name"));
        }

        let latitude = parse_coordinate(&form.latitude)?;
        let longitude = parse_coordinate(&form.longitude)?;
        check_range("latitude", latitude, 90.0)?;
        check_range("longitude", longitude, 180.0)?;

        Ok(Self {
            station_name: name.to_string(),
            station_type: non_blank(&form.station_type),
            latitude,
            longitude,
            address: non_blank(&form.address),
        })
    }
}

/// Raw schedule form fields, as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct ScheduleForm {
    pub route_id: String,
    pub departure_station_id: String,
    pub arrival_station_id: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub day_of_week: String,
}

impl NewSchedule {
    /// Build a schedule payload from form input.
    ///
    /// The three IDs must be positive integers and both times are required.
    /// A blank day is omitted.
    pub fn from_form(form: &ScheduleForm) -> Result<Self, FormError> {
        let route_id = parse_id("route_id", &form.route_id)?;
        let departure_station_id = parse_id("departure_station_id", &form.departure_station_id)?;
        let arrival_station_id = parse_id("arrival_station_id", &form.arrival_station_id)?;

        let departure_time =
            non_blank(&form.departure_time).ok_or(FormError::Missing("departure_time"))?;
        let arrival_time =
            non_blank(&form.arrival_time).ok_or(FormError::Missing("arrival_time"))?;

        Ok(Self {
            route_id,
            departure_station_id,
            arrival_station_id,
            departure_time,
            arrival_time,
            day_of_week: non_blank(&form.day_of_week),
            frequency: None,
        })
    }
}

fn parse_id(field: &'static str, input: &str) -> Result<i64, FormError> {
    match input.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(FormError::InvalidId {
            field,
            value: input.trim().to_string(),
        }),
    }
}

fn check_range(field: &'static str, value: Option<f64>, limit: f64) -> Result<(), FormError> {
    match value {
        Some(value) if value.abs() > limit => Err(FormError::OutOfRange { field, value }),
        _ => Ok(()),
    }
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}
