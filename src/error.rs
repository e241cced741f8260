//! Error types for HTTP API calls.
//!
//! This module distinguishes the *native* failure shapes produced by the
//! underlying HTTP client (transport errors, non-2xx responses) from the
//! *translated* failures the error-handling interceptors normalize them
//! into. Native failures preserve the upstream status and body; translated
//! failures carry exactly a message and a status code, keyed by the
//! standard HTTP semantics (502 Bad Gateway, 504 Gateway Timeout, ...).

use http::{HeaderMap, StatusCode};
use regex::Regex;
use std::sync::OnceLock;

/// The main error type for HTTP API calls.
///
/// # Examples
///
/// ```no_run
/// use gatehouse::{ClientBuilder, ClientBuilderParams, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = ClientBuilder::new(ClientBuilderParams::new("catalog"))?
///     .add_5xx_error_handling()
///     .build();
///
/// match client.get::<serde_json::Value>("https://api.example.com/items").await {
///     Ok(response) => println!("Success: {:?}", response.data),
///     Err(Error::Http { status, message }) => {
///         // Normalized failure from an error-handling interceptor
///         eprintln!("{} ({})", message, status);
///     }
///     Err(Error::Upstream { status, body, .. }) => {
///         // Untranslated upstream failure, body preserved
///         eprintln!("upstream {}: {}", status, body);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A client-originated transport error (connection failure, DNS lookup
    /// failure, timeout, ...).
    ///
    /// This wraps the underlying `reqwest::Error` and indicates a problem
    /// below the HTTP protocol layer. No response was received.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The upstream returned a non-2xx HTTP status code.
    ///
    /// This is the native, untranslated failure shape. The display message
    /// deliberately names only the status; the response body stays
    /// available through the `body` field for callers and for the
    /// auth-error interceptor, which preserves it.
    #[error("Request failed with status code {}", .status.as_u16())]
    Upstream {
        /// The upstream HTTP status code
        status: StatusCode,
        /// The raw response body
        body: String,
        /// The response headers
        headers: Box<HeaderMap>,
    },

    /// A failure translated by an error-handling interceptor.
    ///
    /// Carries exactly a message and a status code, e.g.
    /// `("Bad Gateway", 502)` or `("Gateway Timeout", 504)`. Once a
    /// failure has this shape, later interceptors in the chain leave it
    /// untouched.
    #[error("{message}")]
    Http {
        /// The normalized HTTP status code
        status: StatusCode,
        /// The normalized message
        message: String,
    },

    /// A 2xx response body that could not be deserialized into the
    /// requested type.
    ///
    /// Preserves the raw body and the serde error message. Never touched
    /// by the error-handling interceptors.
    #[error("Failed to deserialize response (status {}): {serde_error}", .status.as_u16())]
    Deserialization {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code of the response
        status: StatusCode,
    },

    /// Invalid configuration was provided.
    ///
    /// Raised synchronously at configuration time, e.g. by
    /// `add_request_logging` when no logger was supplied, or by invalid
    /// header values at construction.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An invalid URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Matches the timeout message surfaced by some HTTP stacks when a request
/// exceeds its deadline, e.g. `timeout of 3000ms exceeded`.
fn timeout_message_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"timeout of [0-9]+ms exceeded").expect("timeout pattern is valid")
    })
}

impl Error {
    /// Builds a translated error from a status code, using the canonical
    /// reason phrase as the message (`502` -> `"Bad Gateway"`).
    pub fn from_status(status: StatusCode) -> Self {
        Error::Http {
            status,
            message: status
                .canonical_reason()
                .unwrap_or("Unknown Error")
                .to_string(),
        }
    }

    /// Builds a translated error from a status code and an explicit message.
    pub fn with_message(status: StatusCode, message: impl Into<String>) -> Self {
        Error::Http {
            status,
            message: message.into(),
        }
    }

    /// Returns `true` if this failure indicates a request timeout.
    ///
    /// Covers both the underlying client's own timeout classification and
    /// the `timeout of <N>ms exceeded` message shape, wherever it appears
    /// in the error's source chain.
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Network(e) => e.is_timeout() || mentions_timeout(e),
            _ => false,
        }
    }

    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Upstream { status, .. } => Some(*status),
            Error::Http { status, .. } => Some(*status),
            Error::Deserialization { status, .. } => Some(*status),
            Error::Network(e) => e.status(),
            _ => None,
        }
    }

    /// Returns the raw upstream response body if this error has one.
    pub fn body(&self) -> Option<&str> {
        match self {
            Error::Upstream { body, .. } => Some(body),
            Error::Deserialization { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }
}

/// Walks the error's source chain looking for the timeout message shape.
fn mentions_timeout(error: &reqwest::Error) -> bool {
    let pattern = timeout_message_pattern();
    if pattern.is_match(&error.to_string()) {
        return true;
    }
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        if pattern.is_match(&cause.to_string()) {
            return true;
        }
        source = cause.source();
    }
    false
}

/// A specialized `Result` type for HTTP API calls.
pub type Result<T> = std::result::Result<T, Error>;
