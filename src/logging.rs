//! The logger collaborator contract and log record shapes.
//!
//! Request logging is observational only: hooks emit one flat [`Record`]
//! per event and never alter the request, response, or error flowing
//! through the pipeline.

use serde::Serialize;

/// A logging collaborator supplied at builder construction.
///
/// Implementations receive flat field records; return values are never
/// consumed. [`TracingLogger`] forwards records onto the `tracing`
/// ecosystem; services with their own structured logger implement the
/// trait directly.
pub trait Logger: Send + Sync {
    /// Records an informational event (request sent, response received).
    fn info(&self, record: &Record);

    /// Records a failure event.
    fn error(&self, record: &Record);
}

/// One flat logging record.
///
/// Field presence depends on the event: request records carry
/// method/host/path, response records add the status, and failure
/// records carry status/message/data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Event name: `<service>-request`, `<service>-response`, or
    /// `<service>-error`.
    pub event: String,
    /// Uppercased HTTP method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// The configured base URL, when one is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// The request path as the caller passed it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Response status code, when a response was received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// The failure's display message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The upstream response body, when one was received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl Record {
    /// A `<service>-request` record, emitted before dispatch.
    pub(crate) fn request(
        service: &str,
        method: &str,
        host: Option<String>,
        path: &str,
    ) -> Self {
        Record {
            event: format!("{service}-request"),
            method: Some(method.to_uppercase()),
            host,
            path: Some(path.to_string()),
            status: None,
            message: None,
            data: None,
        }
    }

    /// A `<service>-response` record, emitted on success.
    pub(crate) fn response(
        service: &str,
        method: &str,
        host: Option<String>,
        path: &str,
        status: u16,
    ) -> Self {
        Record {
            event: format!("{service}-response"),
            method: Some(method.to_uppercase()),
            host,
            path: Some(path.to_string()),
            status: Some(status),
            message: None,
            data: None,
        }
    }

    /// A `<service>-error` record, emitted when a request fails.
    pub(crate) fn failure(
        service: &str,
        status: Option<u16>,
        message: String,
        data: Option<String>,
    ) -> Self {
        Record {
            event: format!("{service}-error"),
            method: None,
            host: None,
            path: None,
            status,
            message: Some(message),
            data,
        }
    }
}

/// Forwards records onto the `tracing` ecosystem.
///
/// # Examples
///
/// ```
/// use gatehouse::{ClientBuilderParams, TracingLogger};
/// use std::sync::Arc;
///
/// tracing_subscriber::fmt()
///     .with_env_filter("gatehouse=info")
///     .init();
///
/// let params = ClientBuilderParams::new("catalog").logger(Arc::new(TracingLogger));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, record: &Record) {
        tracing::info!(
            event = %record.event,
            method = record.method.as_deref(),
            host = record.host.as_deref(),
            path = record.path.as_deref(),
            status = record.status,
        );
    }

    fn error(&self, record: &Record) {
        tracing::error!(
            event = %record.event,
            status = record.status,
            message = record.message.as_deref(),
            data = record.data.as_deref(),
        );
    }
}
