//! Weather data access for Stratus
//!
//! Fetches WeatherAPI.com responses through a retrying HTTP fetcher backed by
//! a short-lived in-memory response cache, and decodes them into typed
//! payloads.

pub mod cache;
pub mod encode;
pub mod error;
pub mod fetcher;
pub mod observer;
pub mod report;
pub mod retry;
pub mod service;
pub mod types;

pub use cache::ResponseCache;
pub use encode::{encode_query, is_valid_ipv4};
pub use error::{FailureKind, FetchError, FetchResult};
pub use fetcher::{Fetcher, FetcherConfig};
pub use observer::{FetchEvent, FetchObserver, FileLogObserver, LogLevel};
pub use report::{export_report, render_report, ReportError};
pub use retry::RetryPolicy;
pub use service::{ApiConfig, WeatherService};
pub use types::*;
