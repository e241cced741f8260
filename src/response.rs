//! Response wrapper that preserves both parsed data and raw response details.

use http::{HeaderMap, StatusCode};
use std::time::Duration;

/// A wrapper around a successful HTTP response.
///
/// Provides the deserialized response data plus metadata about the HTTP
/// transaction: latency, status code, headers, and the raw response body.
///
/// # Type Parameters
///
/// * `T` - The type of the deserialized response data
///
/// # Examples
///
/// ```no_run
/// use gatehouse::{ClientBuilder, ClientBuilderParams, Config};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct User {
///     id: u64,
///     name: String,
/// }
///
/// # async fn example() -> Result<(), gatehouse::Error> {
/// let client = ClientBuilder::new(
///     ClientBuilderParams::new("users").config(Config::new().base_url("https://api.example.com")?),
/// )?
/// .build();
///
/// let response = client.get::<User>("/users/123").await?;
///
/// println!("User: {}", response.data.name);
/// println!("Request took {:?}", response.latency);
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The deserialized response data.
    pub data: T,

    /// The raw response body as a string.
    ///
    /// Useful for debugging, logging, or inspecting the exact bytes the
    /// upstream returned.
    pub raw_body: String,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// The total latency of the request.
    pub latency: Duration,
}

impl<T> Response<T> {
    /// Creates a new `Response`.
    ///
    /// Typically called internally by the client after successfully
    /// deserializing a response body.
    pub fn new(
        data: T,
        raw_body: String,
        status: StatusCode,
        headers: HeaderMap,
        latency: Duration,
    ) -> Self {
        Self {
            data,
            raw_body,
            status,
            headers,
            latency,
        }
    }

    /// Maps the response data to a different type, preserving the metadata.
    ///
    /// # Examples
    ///
    /// ```
    /// # use gatehouse::Response;
    /// # use http::{HeaderMap, StatusCode};
    /// # use std::time::Duration;
    /// let response = Response::new(
    ///     42,
    ///     "42".to_string(),
    ///     StatusCode::OK,
    ///     HeaderMap::new(),
    ///     Duration::from_millis(100),
    /// );
    ///
    /// let string_response = response.map(|n| n.to_string());
    /// assert_eq!(string_response.data, "42");
    /// ```
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            data: f(self.data),
            raw_body: self.raw_body,
            status: self.status,
            headers: self.headers,
            latency: self.latency,
        }
    }

    /// Returns a reference to a header value by name.
    ///
    /// # Examples
    ///
    /// ```
    /// # use gatehouse::Response;
    /// # use http::{HeaderMap, StatusCode, HeaderValue};
    /// # use std::time::Duration;
    /// let mut headers = HeaderMap::new();
    /// headers.insert("content-type", HeaderValue::from_static("application/json"));
    ///
    /// let response = Response::new(
    ///     (),
    ///     String::new(),
    ///     StatusCode::OK,
    ///     headers,
    ///     Duration::from_millis(100),
    /// );
    ///
    /// assert_eq!(
    ///     response.header("content-type").unwrap(),
    ///     "application/json"
    /// );
    /// ```
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

impl<T> AsRef<T> for Response<T> {
    fn as_ref(&self) -> &T {
        &self.data
    }
}

impl<T> std::ops::Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}
