//! Error report channel.
//!
//! [`BackendResponse::verify`](crate::BackendResponse::verify) classifies a
//! rejected response and hands exactly one [`ErrorReport`] to an
//! [`ErrorSink`]. Routing and formatting beyond that belong to the sink.

use std::fmt;
use std::sync::Mutex;

use serde::Serialize;

use crate::error::{BackendError, ErrorKind};

/// Caller-supplied category of the operation that consumed the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Configuration delivery.
    Config,
    /// Plugin delivery.
    Plugin,
    /// Runtime failure inside the agent.
    Runtime,
    /// Host environment problem.
    Environment,
    /// Log shipping.
    Log,
    /// Agent registration and heartbeat.
    Agent,
}

impl ErrorCode {
    /// Stable numeric code used by the agent's log sink.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        match self {
            Self::Config => 20001,
            Self::Plugin => 20002,
            Self::Runtime => 20003,
            Self::Environment => 20004,
            Self::Log => 20005,
            Self::Agent => 20010,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

/// One classified failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Category supplied by the caller.
    pub code: ErrorCode,
    /// Classification of the failure.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
}

impl ErrorReport {
    /// Build a report from a backend error.
    #[must_use]
    pub fn new(code: ErrorCode, error: &BackendError) -> Self {
        Self {
            code,
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Destination for error reports.
pub trait ErrorSink: Send + Sync {
    /// Receive a report.
    fn report(&self, report: &ErrorReport);
}

/// Sink that emits each report as a `tracing` warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn report(&self, report: &ErrorReport) {
        tracing::warn!(
            code = report.code.as_u32(),
            kind = %report.kind,
            "{}",
            report.message
        );
    }
}

/// Sink that keeps every report in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    reports: Mutex<Vec<ErrorReport>>,
}

impl CollectingSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the reports received so far.
    #[must_use]
    pub fn reports(&self) -> Vec<ErrorReport> {
        self.reports
            .lock()
            .map(|r| r.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Remove and return all reports.
    pub fn take(&self) -> Vec<ErrorReport> {
        match self.reports.lock() {
            Ok(mut r) => std::mem::take(&mut *r),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    /// Whether no report has been received.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports().is_empty()
    }
}

impl ErrorSink for CollectingSink {
    fn report(&self, report: &ErrorReport) {
        match self.reports.lock() {
            Ok(mut r) => r.push(report.clone()),
            Err(poisoned) => poisoned.into_inner().push(report.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_numbers_are_stable() {
        assert_eq!(ErrorCode::Config.as_u32(), 20001);
        assert_eq!(ErrorCode::Plugin.as_u32(), 20002);
        assert_eq!(ErrorCode::Agent.to_string(), "20010");
    }

    #[test]
    fn collecting_sink_records_and_drains() {
        let sink = CollectingSink::new();
        assert!(sink.is_empty());

        let err = BackendError::TransportFailure { status_code: 404 };
        sink.report(&ErrorReport::new(ErrorCode::Plugin, &err));

        let reports = sink.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].code, ErrorCode::Plugin);
        assert_eq!(reports[0].kind, ErrorKind::TransportFailure);
        assert!(reports[0].message.contains("404"));

        assert_eq!(sink.take().len(), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn tracing_sink_does_not_panic_without_subscriber() {
        let err = BackendError::ParseFailure {
            message: "Invalid value.".to_string(),
        };
        TracingSink.report(&ErrorReport::new(ErrorCode::Config, &err));
    }
}
