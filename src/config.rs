//! Client configuration with deep-merge over builder defaults.

use crate::{Error, Result};
use http::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use url::Url;

/// Caller-supplied configuration for the underlying HTTP client.
///
/// Merged on top of the builder's defaults (3000 ms timeout, `Trace-Id`
/// and `User-Agent` headers) with deep-merge semantics: values set here
/// win at matching keys, headers merge key-by-key, and defaults the
/// caller never mentions survive.
///
/// # Examples
///
/// ```
/// use gatehouse::Config;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), gatehouse::Error> {
/// let config = Config::new()
///     .base_url("https://api.example.com")?
///     .timeout(Duration::from_millis(5000))
///     .header("Accept", "application/json")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub(crate) base_url: Option<Url>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) headers: HeaderMap,
}

impl Config {
    /// Creates an empty configuration; every field falls back to the
    /// builder's defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL that relative request paths are joined onto.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.base_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Sets the request timeout, replacing the 3000 ms default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds a default header sent with every request.
    ///
    /// A header set here overrides a builder default of the same name
    /// (e.g. `User-Agent`).
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Deep-merges this configuration over `defaults`.
    ///
    /// Scalars set here replace the default; headers merge key-by-key
    /// with this configuration's entries replacing same-named defaults.
    pub(crate) fn merged_over(self, defaults: Config) -> Config {
        let mut headers = defaults.headers;
        for (name, value) in self.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }
        Config {
            base_url: self.base_url.or(defaults.base_url),
            timeout: self.timeout.or(defaults.timeout),
            headers,
        }
    }
}
