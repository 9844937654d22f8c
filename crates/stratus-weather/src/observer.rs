//! Fetch observers: optional sinks that hear about every attempt and outcome.
//!
//! The fetcher always emits `tracing` events; an observer is an additional,
//! optional destination (the activity log file, test recorders).

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::FailureKind;

/// Severity attached to an event when it is written to a log
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

/// Something that happened during a fetch. URLs are already redacted.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchEvent {
    CacheHit {
        url: String,
    },
    AttemptFailed {
        url: String,
        attempt: u32,
        max_attempts: u32,
        error: String,
    },
    Backoff {
        attempt: u32,
        delay: Duration,
    },
    Succeeded {
        url: String,
        attempts: u32,
        cached: bool,
    },
    Failed {
        url: String,
        kind: FailureKind,
        detail: String,
    },
}

impl FetchEvent {
    pub fn level(&self) -> LogLevel {
        match self {
            Self::CacheHit { .. } | Self::Backoff { .. } => LogLevel::Debug,
            Self::Succeeded { .. } => LogLevel::Info,
            Self::AttemptFailed { .. } => LogLevel::Warning,
            Self::Failed { .. } => LogLevel::Error,
        }
    }

    /// One-line description used by log sinks
    pub fn message(&self) -> String {
        match self {
            Self::CacheHit { url } => format!("Using cached data for: {}", url),
            Self::AttemptFailed {
                attempt,
                max_attempts,
                error,
                ..
            } => format!(
                "Request attempt {} of {} failed: {}",
                attempt, max_attempts, error
            ),
            Self::Backoff { attempt, delay } => {
                format!("Waiting {:?} before attempt {}", delay, attempt + 1)
            }
            Self::Succeeded {
                url,
                attempts,
                cached,
            } => format!(
                "Fetched {} in {} attempt(s){}",
                url,
                attempts,
                if *cached { ", cached" } else { "" }
            ),
            Self::Failed { kind, detail, .. } => match kind {
                FailureKind::Network => format!("Request failed after retries: {}", detail),
                FailureKind::Parse => format!("JSON parsing error: {}", detail),
                FailureKind::Api => format!("API Error: {}", detail),
            },
        }
    }
}

/// Receives fetch events. Implementations must not panic or block for long.
pub trait FetchObserver: Send + Sync {
    fn on_event(&self, event: &FetchEvent);
}

/// Hide the API key in a request URL before it reaches any log.
pub fn redact_key(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };

    let params: Vec<String> = query
        .split('&')
        .map(|param| {
            if param.starts_with("key=") {
                "key=***".to_string()
            } else {
                param.to_string()
            }
        })
        .collect();

    format!("{}?{}", base, params.join("&"))
}

/// Appends timestamped lines to a log file while enabled.
///
/// Write failures are swallowed: a broken log must never break a fetch.
#[derive(Debug)]
pub struct FileLogObserver {
    path: PathBuf,
    enabled: AtomicBool,
    write_lock: Mutex<()>,
}

impl FileLogObserver {
    pub fn new(path: impl Into<PathBuf>, enabled: bool) -> Self {
        Self {
            path: path.into(),
            enabled: AtomicBool::new(enabled),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Flip logging on/off, returning the new state
    pub fn toggle(&self) -> bool {
        !self.enabled.fetch_xor(true, Ordering::Relaxed)
    }

    /// Write a line regardless of where it came from (app lifecycle, etc.)
    pub fn log(&self, level: LogLevel, message: &str) {
        if !self.is_enabled() {
            return;
        }

        let _guard = self.write_lock.lock();
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| {
                writeln!(file, "{} [{}] {}", timestamp, level.as_str(), message)
            });

        if let Err(e) = result {
            tracing::debug!("Failed to write activity log {}: {}", self.path.display(), e);
        }
    }
}

impl FetchObserver for FileLogObserver {
    fn on_event(&self, event: &FetchEvent) {
        self.log(event.level(), &event.message());
    }
}
