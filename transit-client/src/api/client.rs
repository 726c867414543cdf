//! Typed accessors for the transit backend resources.
//!
//! Each accessor calls the generic [`HttpClient`] against a fixed path and
//! unwraps the `{ data }` envelope. List accessors never fail: any error is
//! logged and degrades to an empty collection, so list views are never
//! blocked by a transient fetch error. Single-entity reads and writes return
//! the error, since the user is waiting on the outcome. Writes yield the
//! backend's [`WriteAck`] rather than the stored entity.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::http::{ClientConfig, ClientError, HttpClient, QueryBuilder, ResponseBody};

use super::types::{
    Delay, DelayStatusUpdate, HealthStatus, NewDelay, NewRoute, NewSchedule, NewStation, Route,
    Schedule, SearchResults, SearchType, Station, WriteAck,
};

/// Client for the transit tracking API.
#[derive(Debug, Clone)]
pub struct TransitApi {
    http: HttpClient,
}

impl TransitApi {
    /// Create a new API client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::from_http(HttpClient::new(config)?))
    }

    /// Wrap an existing HTTP client.
    pub fn from_http(http: HttpClient) -> Self {
        Self { http }
    }

    /// Access the underlying HTTP client.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Mutable access to the underlying HTTP client, for base-URL overrides.
    pub fn http_mut(&mut self) -> &mut HttpClient {
        &mut self.http
    }

    // Routes

    /// List all routes. Empty on failure.
    pub async fn fetch_routes(&self) -> Vec<Route> {
        self.list("/routes").await
    }

    /// Get one route by ID.
    pub async fn fetch_route(&self, id: i64) -> Result<Route, ClientError> {
        self.one(&format!("/routes/{id}")).await
    }

    /// Create a route. The ack carries the new `route_id`.
    pub async fn create_route(&self, route: &NewRoute) -> Result<WriteAck, ClientError> {
        self.write(Method::POST, "/routes", route).await
    }

    // Stations

    /// List all stations. Empty on failure.
    pub async fn fetch_stations(&self) -> Vec<Station> {
        self.list("/stations").await
    }

    /// Get one station by ID.
    pub async fn fetch_station(&self, id: i64) -> Result<Station, ClientError> {
        self.one(&format!("/stations/{id}")).await
    }

    /// Create a station. The ack carries the new `station_id`.
    pub async fn create_station(&self, station: &NewStation) -> Result<WriteAck, ClientError> {
        self.write(Method::POST, "/stations", station).await
    }

    // Schedules

    /// List schedules, optionally filtered by route and day. Empty on failure.
    pub async fn fetch_schedules(
        &self,
        route_id: Option<i64>,
        day_of_week: Option<&str>,
    ) -> Vec<Schedule> {
        self.list(&schedules_path(route_id, day_of_week)).await
    }

    /// Get one schedule by ID.
    pub async fn fetch_schedule(&self, id: i64) -> Result<Schedule, ClientError> {
        self.one(&format!("/schedules/{id}")).await
    }

    /// List the schedules of one route. Empty on failure.
    pub async fn fetch_route_schedules(&self, route_id: i64) -> Vec<Schedule> {
        self.list(&format!("/routes/{route_id}/schedules")).await
    }

    /// Create a schedule. The ack carries the new `schedule_id`.
    pub async fn create_schedule(&self, schedule: &NewSchedule) -> Result<WriteAck, ClientError> {
        self.write(Method::POST, "/schedules", schedule).await
    }

    // Delays

    /// List delay reports, optionally filtered by status and route.
    /// Empty on failure.
    pub async fn fetch_delays(
        &self,
        is_active: Option<bool>,
        route_id: Option<i64>,
    ) -> Vec<Delay> {
        self.list(&delays_path(is_active, route_id)).await
    }

    /// Get one delay report by ID.
    pub async fn fetch_delay(&self, id: i64) -> Result<Delay, ClientError> {
        self.one(&format!("/delays/{id}")).await
    }

    /// List the delay reports filed against one schedule. Empty on failure.
    pub async fn fetch_schedule_delays(&self, schedule_id: i64) -> Vec<Delay> {
        self.list(&format!("/schedules/{schedule_id}/delays")).await
    }

    /// File a delay report. The ack carries the new `delay_id`.
    pub async fn create_delay(&self, delay: &NewDelay) -> Result<WriteAck, ClientError> {
        self.write(Method::POST, "/delays", delay).await
    }

    /// Mark a delay report active or resolved.
    pub async fn update_delay_status(
        &self,
        id: i64,
        is_active: bool,
    ) -> Result<WriteAck, ClientError> {
        let update = DelayStatusUpdate { is_active };
        self.write(Method::PUT, &format!("/delays/{id}"), &update).await
    }

    // Search and health

    /// Search routes and schedules. Empty results on failure.
    ///
    /// A blank query matches nothing and is not sent.
    pub async fn search(&self, query: &str, search_type: Option<SearchType>) -> SearchResults {
        if query.trim().is_empty() {
            return SearchResults::default();
        }
        self.list(&search_path(query, search_type)).await
    }

    /// Whether the backend reports itself healthy.
    ///
    /// Only an explicit top-level `"status": "healthy"` counts; errors and
    /// any other status are `false`.
    pub async fn check_health(&self) -> bool {
        const ENDPOINT: &str = "/health";

        match self.http.get(ENDPOINT).await {
            Ok(body) => health_of(&body),
            Err(e) => {
                warn!(endpoint = ENDPOINT, error = %e, "health check failed");
                false
            }
        }
    }

    async fn list<T>(&self, endpoint: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        match self.http.get_data(endpoint).await {
            Ok(data) => data.unwrap_or_default(),
            Err(e) => {
                warn!(endpoint, error = %e, "falling back to empty result");
                T::default()
            }
        }
    }

    async fn one<T>(&self, endpoint: &str) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let data = self.http.get_data(endpoint).await?;
        require(endpoint, data)
    }

    async fn write<B>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> Result<WriteAck, ClientError>
    where
        B: serde::Serialize,
    {
        let data = self.http.send_data(method, endpoint, body).await?;
        Ok(data.unwrap_or_default())
    }
}

/// Path for `GET /schedules` with the given filters.
pub fn schedules_path(route_id: Option<i64>, day_of_week: Option<&str>) -> String {
    QueryBuilder::new("/schedules")
        .param("route_id", route_id)
        .param("day_of_week", day_of_week)
        .build()
}

/// Path for `GET /delays` with the given filters.
pub fn delays_path(is_active: Option<bool>, route_id: Option<i64>) -> String {
    QueryBuilder::new("/delays")
        .param("is_active", is_active)
        .param("route_id", route_id)
        .build()
}

/// Path for `GET /search`.
pub fn search_path(query: &str, search_type: Option<SearchType>) -> String {
    QueryBuilder::new("/search")
        .param("q", Some(query))
        .param("type", search_type)
        .build()
}

/// A single-entity response must carry data.
fn require<T>(endpoint: &str, data: Option<T>) -> Result<T, ClientError> {
    data.ok_or_else(|| {
        tracing::error!(endpoint, "API response has no data");
        ClientError::Decode {
            endpoint: endpoint.to_string(),
            message: "response has no data".to_string(),
        }
    })
}

/// Health status from the top-level `status` field. `/health` is not
/// enveloped, so a nested `data` is ignored.
fn health_of(body: &ResponseBody) -> bool {
    body.as_json()
        .cloned()
        .and_then(|v: Value| serde_json::from_value::<HealthStatus>(v).ok())
        .is_some_and(|h| h.is_healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schedule_filters() {
        assert_eq!(schedules_path(None, None), "/schedules");
        assert_eq!(schedules_path(Some(5), None), "/schedules?route_id=5");
        assert_eq!(
            schedules_path(None, Some("Monday")),
            "/schedules?day_of_week=Monday"
        );
        assert_eq!(
            schedules_path(Some(5), Some("Friday")),
            "/schedules?route_id=5&day_of_week=Friday"
        );
        assert_eq!(schedules_path(Some(5), Some("")), "/schedules?route_id=5");
    }

    #[test]
    fn delay_filters() {
        assert_eq!(delays_path(None, None), "/delays");
        assert_eq!(delays_path(Some(true), None), "/delays?is_active=true");
        assert_eq!(delays_path(Some(false), None), "/delays?is_active=false");
        assert_eq!(delays_path(None, Some(12)), "/delays?route_id=12");
        assert_eq!(
            delays_path(Some(true), Some(12)),
            "/delays?is_active=true&route_id=12"
        );
    }

    #[test]
    fn search_filters() {
        assert_eq!(search_path("harbour", None), "/search?q=harbour");
        assert_eq!(
            search_path("harbour", Some(SearchType::Route)),
            "/search?q=harbour&type=route"
        );
        assert_eq!(
            search_path("harbour", Some(SearchType::Schedule)),
            "/search?q=harbour&type=schedule"
        );
    }

    #[test]
    fn health_reads_top_level_status_only() {
        let healthy = ResponseBody::Json(json!({
            "status": "healthy",
            "service": "public-transport-tracker-api",
            "database": "connected"
        }));
        assert!(health_of(&healthy));

        let nested = ResponseBody::Json(json!({
            "status": "unhealthy",
            "data": {"status": "healthy"}
        }));
        assert!(!health_of(&nested));

        let wrapped_only = ResponseBody::Json(json!({"data": {"status": "healthy"}}));
        assert!(!health_of(&wrapped_only));

        let text = ResponseBody::Text("healthy".into());
        assert!(!health_of(&text));
    }

    #[test]
    fn require_reports_missing_data() {
        let err = require::<Route>("/routes/4", None).unwrap_err();
        match err {
            ClientError::Decode { endpoint, message } => {
                assert_eq!(endpoint, "/routes/4");
                assert_eq!(message, "response has no data");
            }
            other => panic!("expected decode error, got {other:?}"),
        }
    }
}
