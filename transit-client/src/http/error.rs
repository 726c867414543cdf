//! HTTP client error types.

use std::time::Duration;

/// Errors that can occur when talking to the transit backend.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Backend answered with a non-2xx status
    #[error("{endpoint}: {message} (status {status})")]
    Http {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// Request could not be dispatched or the connection failed
    #[error("{endpoint}: network error: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// No response within the configured timeout
    #[error("{endpoint}: request timed out after {}ms", .after.as_millis())]
    Timeout { endpoint: String, after: Duration },

    /// Payload did not have the expected shape
    #[error("{endpoint}: unexpected payload: {message}")]
    Decode { endpoint: String, message: String },

    /// Endpoint is not a path relative to the base URL
    #[error("invalid endpoint {0:?}: must begin with '/'")]
    InvalidEndpoint(String),

    /// Base URL or page origin could not be parsed
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Building the underlying HTTP client failed
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl ClientError {
    /// The endpoint the failed request was addressed to, if any.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            ClientError::Http { endpoint, .. }
            | ClientError::Network { endpoint, .. }
            | ClientError::Timeout { endpoint, .. }
            | ClientError::Decode { endpoint, .. } => Some(endpoint),
            ClientError::InvalidEndpoint(endpoint) => Some(endpoint),
            ClientError::InvalidBaseUrl(_) | ClientError::Client(_) => None,
        }
    }

    /// HTTP status code, for errors that carry one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this error came from the timeout firing.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ClientError::Http {
            endpoint: "/routes/7".into(),
            status: 404,
            message: "Route not found".into(),
        };
        assert_eq!(err.to_string(), "/routes/7: Route not found (status 404)");
        assert_eq!(err.status(), Some(404));

        let err = ClientError::Timeout {
            endpoint: "/health".into(),
            after: Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "/health: request timed out after 30000ms");
        assert!(err.is_timeout());

        let err = ClientError::InvalidEndpoint("routes".into());
        assert!(err.to_string().contains("must begin with '/'"));
    }

    #[test]
    fn endpoint_accessor() {
        let err = ClientError::Decode {
            endpoint: "/stations".into(),
            message: "missing field `name`".into(),
        };
        assert_eq!(err.endpoint(), Some("/stations"));
        assert_eq!(err.status(), None);
        assert!(!err.is_timeout());

        let err = ClientError::InvalidBaseUrl("nope".into());
        assert_eq!(err.endpoint(), None);
    }
}
