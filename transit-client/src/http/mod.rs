//! Generic HTTP client for the transit backend.
//!
//! Resolves endpoints against a configured base URL, enforces a request
//! timeout, negotiates JSON/text bodies and reports every failure through
//! [`ClientError`].

mod client;
mod config;
mod error;
mod query;

pub use client::{HttpClient, ResponseBody};
pub use config::{BACKEND_PORT, ClientConfig, DEFAULT_TIMEOUT, LOCAL_BASE_URL, detect_base_url};
pub use error::ClientError;
pub use query::QueryBuilder;
