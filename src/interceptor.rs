//! Error-translation interceptors and per-request authorization.
//!
//! The builder accumulates an ordered list of [`ErrorInterceptor`]s. Each
//! entry passes successful responses through untouched and, on failure,
//! either translates the error into its normalized form or passes it
//! along unchanged. Translated failures ([`crate::Error::Http`]) never
//! match again, so at most one translation fires per request no matter
//! how the chain is ordered.

use crate::Error;
use http::StatusCode;

/// A response-pipeline entry that normalizes one class of failure.
///
/// Applied in registration order by the built client; the first entry to
/// recognize a failure replaces it, and everything downstream sees the
/// replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorInterceptor {
    /// Timeouts become 504 Gateway Timeout; transport errors without a
    /// response and upstream statuses >= 500 become 502 Bad Gateway.
    GatewayErrors,
    /// Upstream 404 becomes a generic 404 Not Found.
    NotFound,
    /// Upstream 401/403 keep their status; the message becomes the
    /// JSON-serialized upstream body.
    AuthErrors,
}

impl ErrorInterceptor {
    /// Translates a failure, or returns it unchanged.
    pub(crate) fn apply(&self, error: Error) -> Error {
        match self {
            ErrorInterceptor::GatewayErrors => {
                if error.is_timeout() {
                    return Error::from_status(StatusCode::GATEWAY_TIMEOUT);
                }
                match error {
                    Error::Network(_) => Error::from_status(StatusCode::BAD_GATEWAY),
                    Error::Upstream { status, .. } if status.is_server_error() => {
                        Error::from_status(StatusCode::BAD_GATEWAY)
                    }
                    other => other,
                }
            }
            ErrorInterceptor::NotFound => match error {
                Error::Upstream { status, .. } if status == StatusCode::NOT_FOUND => {
                    Error::from_status(StatusCode::NOT_FOUND)
                }
                other => other,
            },
            ErrorInterceptor::AuthErrors => match error {
                Error::Upstream { status, body, .. }
                    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN =>
                {
                    Error::with_message(status, serialize_body(&body))
                }
                other => other,
            },
        }
    }
}

/// Reproduces `JSON.stringify` over an upstream body: a body that parses
/// as JSON re-serializes canonically, anything else becomes a JSON string
/// (`Unauthorized User` -> `"Unauthorized User"`).
fn serialize_body(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value.to_string(),
        Err(_) => serde_json::Value::String(body.to_string()).to_string(),
    }
}

/// The `Authorization` header source attached by
/// [`ClientBuilder::add_authorization`](crate::ClientBuilder::add_authorization).
///
/// Chosen at configuration time: either a fixed value sent with every
/// request, or a generator invoked fresh per request (for short-lived
/// tokens). Either way, a request that already carries an explicit
/// `Authorization` header is left alone.
///
/// # Examples
///
/// ```
/// use gatehouse::Authorization;
///
/// let fixed = Authorization::from("Bearer abc123");
/// let minted = Authorization::dynamic(|| format!("Bearer {}", "fresh-token"));
/// ```
pub enum Authorization {
    /// A fixed header value.
    Static(String),
    /// A generator invoked once per outgoing request.
    Dynamic(Box<dyn Fn() -> String + Send + Sync>),
}

impl Authorization {
    /// Wraps a per-request header value generator.
    pub fn dynamic<F>(generator: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Authorization::Dynamic(Box::new(generator))
    }

    /// Produces the header value for one request.
    pub(crate) fn value(&self) -> String {
        match self {
            Authorization::Static(value) => value.clone(),
            Authorization::Dynamic(generator) => generator(),
        }
    }
}

impl From<String> for Authorization {
    fn from(value: String) -> Self {
        Authorization::Static(value)
    }
}

impl From<&str> for Authorization {
    fn from(value: &str) -> Self {
        Authorization::Static(value.to_string())
    }
}

impl std::fmt::Debug for Authorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Header values are credentials; never echo them.
        match self {
            Authorization::Static(_) => f.write_str("Authorization::Static(..)"),
            Authorization::Dynamic(_) => f.write_str("Authorization::Dynamic(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderMap;

    fn upstream(status: StatusCode, body: &str) -> Error {
        Error::Upstream {
            status,
            body: body.to_string(),
            headers: Box::new(HeaderMap::new()),
        }
    }

    #[test]
    fn gateway_errors_translate_5xx_to_bad_gateway() {
        for status in [StatusCode::INTERNAL_SERVER_ERROR, StatusCode::SERVICE_UNAVAILABLE] {
            let translated = ErrorInterceptor::GatewayErrors.apply(upstream(status, "boom"));
            assert_eq!(translated.to_string(), "Bad Gateway");
            assert_eq!(translated.status(), Some(StatusCode::BAD_GATEWAY));
        }
    }

    #[test]
    fn gateway_errors_pass_4xx_through() {
        let err = ErrorInterceptor::GatewayErrors.apply(upstream(StatusCode::BAD_REQUEST, ""));
        assert_eq!(err.to_string(), "Request failed with status code 400");
    }

    #[test]
    fn not_found_translates_only_404() {
        let translated = ErrorInterceptor::NotFound.apply(upstream(StatusCode::NOT_FOUND, ""));
        assert_eq!(translated.to_string(), "Not Found");
        assert_eq!(translated.status(), Some(StatusCode::NOT_FOUND));

        let passed = ErrorInterceptor::NotFound.apply(upstream(StatusCode::BAD_REQUEST, ""));
        assert_eq!(passed.status(), Some(StatusCode::BAD_REQUEST));
        assert!(matches!(passed, Error::Upstream { .. }));
    }

    #[test]
    fn auth_errors_preserve_the_body_as_json() {
        let translated =
            ErrorInterceptor::AuthErrors.apply(upstream(StatusCode::UNAUTHORIZED, "Unauthorized User"));
        assert_eq!(translated.to_string(), "\"Unauthorized User\"");
        assert_eq!(translated.status(), Some(StatusCode::UNAUTHORIZED));

        let translated =
            ErrorInterceptor::AuthErrors.apply(upstream(StatusCode::FORBIDDEN, "Forbidden User"));
        assert_eq!(translated.to_string(), "\"Forbidden User\"");
        assert_eq!(translated.status(), Some(StatusCode::FORBIDDEN));
    }

    #[test]
    fn auth_errors_pass_5xx_through() {
        let passed =
            ErrorInterceptor::AuthErrors.apply(upstream(StatusCode::INTERNAL_SERVER_ERROR, "Server Error"));
        assert_eq!(passed.to_string(), "Request failed with status code 500");
    }

    #[test]
    fn translated_errors_are_never_retranslated() {
        // 404 translated first, then run through the remaining handlers.
        let err = ErrorInterceptor::NotFound.apply(upstream(StatusCode::NOT_FOUND, ""));
        let err = ErrorInterceptor::AuthErrors.apply(err);
        let err = ErrorInterceptor::GatewayErrors.apply(err);
        assert_eq!(err.to_string(), "Not Found");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn serialize_body_quotes_plain_text() {
        assert_eq!(serialize_body("Unauthorized User"), "\"Unauthorized User\"");
    }

    #[test]
    fn serialize_body_keeps_json_canonical() {
        assert_eq!(serialize_body(r#"{"reason":"expired"}"#), r#"{"reason":"expired"}"#);
        assert_eq!(serialize_body("\"already a string\""), "\"already a string\"");
    }

    #[test]
    fn static_authorization_yields_its_value() {
        let auth = Authorization::from("Bearer abc");
        assert_eq!(auth.value(), "Bearer abc");
        assert_eq!(auth.value(), "Bearer abc");
    }

    #[test]
    fn dynamic_authorization_is_invoked_per_call() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let counter = std::sync::Arc::new(AtomicUsize::new(0));
        let seen = counter.clone();
        let auth = Authorization::dynamic(move || {
            format!("token-{}", seen.fetch_add(1, Ordering::SeqCst))
        });
        assert_eq!(auth.value(), "token-0");
        assert_eq!(auth.value(), "token-1");
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
