//! Generic HTTP client for the transit backend.
//!
//! Every request is raced against a timeout; dropping the losing future
//! cancels the in-flight request. Responses are negotiated into JSON or text
//! by their declared content type, and every failure is logged once here
//! before it reaches the caller.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use super::config::ClientConfig;
use super::error::ClientError;

/// A response body, parsed according to its declared content type.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Body declared `application/json`
    Json(Value),
    /// Any other body, kept verbatim
    Text(String),
}

impl ResponseBody {
    /// The JSON value, if this body was JSON.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    /// The envelope's `data` field.
    ///
    /// Text bodies, non-object bodies and `"data": null` all count as absent.
    pub fn data(&self) -> Option<&Value> {
        self.as_json()
            .and_then(|v| v.get("data"))
            .filter(|v| !v.is_null())
    }

    /// The envelope's `message` field, if it is a string.
    pub fn message(&self) -> Option<&str> {
        self.as_json()
            .and_then(|v| v.get("message"))
            .and_then(Value::as_str)
    }
}

/// HTTP client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            timeout: config.timeout,
        })
    }

    /// The base URL endpoints are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Point the client at a different backend.
    ///
    /// Intended for startup configuration; clones made earlier keep the
    /// old base URL.
    pub fn set_base_url(&mut self, url: impl Into<String>) {
        let mut url = url.into();
        while url.ends_with('/') {
            url.pop();
        }
        self.base_url = url;
    }

    /// The request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Issue one request and return its parsed body.
    ///
    /// `endpoint` is a path relative to the base URL and must begin with `/`.
    /// A present `body` is sent as JSON. The body of a 2xx response is
    /// returned as-is; the envelope is not unwrapped.
    pub async fn request<B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<ResponseBody, ClientError>
    where
        B: Serialize + ?Sized,
    {
        if !endpoint.starts_with('/') {
            error!(endpoint, "API request rejected: endpoint must begin with '/'");
            return Err(ClientError::InvalidEndpoint(endpoint.to_string()));
        }

        let url = format!("{}{}", self.base_url, endpoint);
        debug!(method = method.as_str(), %url, "API request");

        let mut builder = self.http.request(method, &url);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let exchange = async {
            let response = builder.send().await?;
            let status = response.status();
            let body = read_body(response).await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        let (status, body) = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(Ok(result)) => result,
            Ok(Err(source)) => {
                error!(endpoint, error = %source, "API request failed");
                return Err(ClientError::Network {
                    endpoint: endpoint.to_string(),
                    source,
                });
            }
            Err(_) => {
                error!(
                    endpoint,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "API request timed out"
                );
                return Err(ClientError::Timeout {
                    endpoint: endpoint.to_string(),
                    after: self.timeout,
                });
            }
        };

        if !status.is_success() {
            let message = body
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
            error!(endpoint, status = status.as_u16(), %message, "API request failed");
            return Err(ClientError::Http {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    /// `GET endpoint`.
    pub async fn get(&self, endpoint: &str) -> Result<ResponseBody, ClientError> {
        self.request::<Value>(Method::GET, endpoint, None).await
    }

    /// `POST endpoint` with a JSON body.
    pub async fn post<B>(&self, endpoint: &str, body: &B) -> Result<ResponseBody, ClientError>
    where
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, endpoint, Some(body)).await
    }

    /// `PUT endpoint` with a JSON body.
    pub async fn put<B>(&self, endpoint: &str, body: &B) -> Result<ResponseBody, ClientError>
    where
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, endpoint, Some(body)).await
    }

    /// `DELETE endpoint`.
    pub async fn delete(&self, endpoint: &str) -> Result<ResponseBody, ClientError> {
        self.request::<Value>(Method::DELETE, endpoint, None).await
    }

    /// `GET endpoint` and decode the envelope's `data` into `T`.
    pub async fn get_data<T>(&self, endpoint: &str) -> Result<Option<T>, ClientError>
    where
        T: DeserializeOwned,
    {
        let body = self.get(endpoint).await?;
        decode_data(endpoint, &body)
    }

    /// Send `body` with `method` and decode the envelope's `data` into `T`.
    pub async fn send_data<B, T>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> Result<Option<T>, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.request(method, endpoint, Some(body)).await?;
        decode_data(endpoint, &body)
    }
}

/// Read a response body, parsing it as JSON only when it is declared as JSON.
async fn read_body(response: Response) -> Result<ResponseBody, reqwest::Error> {
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(is_json_content_type);

    let text = response.text().await?;
    if !is_json {
        return Ok(ResponseBody::Text(text));
    }

    // A body that claims JSON but isn't stays readable as text
    match serde_json::from_str(&text) {
        Ok(value) => Ok(ResponseBody::Json(value)),
        Err(_) => Ok(ResponseBody::Text(text)),
    }
}

fn is_json_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || mime.ends_with("+json")
}

/// Decode the envelope's `data` field. Absent data is `Ok(None)`.
fn decode_data<T>(
    endpoint: &str,
    body: &ResponseBody,
) -> Result<Option<T>, ClientError>
where
    T: DeserializeOwned,
{
    let Some(data) = body.data() else {
        return Ok(None);
    };

    T::deserialize(data).map(Some).map_err(|e| {
        error!(endpoint, error = %e, "API response did not match expected shape");
        ClientError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        }
    })
}
