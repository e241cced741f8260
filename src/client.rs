//! HTTP client builder with composable cross-cutting behavior.
//!
//! [`ClientBuilder`] is the entry point: it wraps a `reqwest` client,
//! accumulates optional behaviors through chained configuration calls,
//! and [`ClientBuilder::build`] materializes them into a ready [`Client`].

use crate::{
    config::Config,
    interceptor::{Authorization, ErrorInterceptor},
    logging::{Logger, Record},
    metadata::RequestMetadata,
    Error, Response, Result,
};
use http::{
    header::{HeaderValue, AUTHORIZATION, USER_AGENT},
    HeaderMap, HeaderName, Method,
};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Default request timeout applied when the caller's config does not
/// override it.
const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);

const TRACE_ID: HeaderName = HeaderName::from_static("trace-id");

/// Parameters for [`ClientBuilder::new`].
///
/// Only `service` is required; everything else is optional.
///
/// # Examples
///
/// ```
/// use gatehouse::{ClientBuilderParams, Config, TracingLogger};
/// use std::sync::Arc;
///
/// # fn example() -> Result<(), gatehouse::Error> {
/// let params = ClientBuilderParams::new("catalog")
///     .agent("catalog/1.0")
///     .trace_id("abc-123")
///     .logger(Arc::new(TracingLogger))
///     .config(Config::new().base_url("https://api.example.com")?);
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilderParams {
    /// Service name, used to name log events (`<service>-request`, ...).
    pub service: String,
    /// Value for the default `User-Agent` header, when given.
    pub agent: Option<String>,
    /// Value for the default `Trace-Id` header, when given.
    pub trace_id: Option<String>,
    /// Logging collaborator; required before `add_request_logging`.
    pub logger: Option<Arc<dyn Logger>>,
    /// Configuration deep-merged over the builder defaults.
    pub config: Option<Config>,
}

impl ClientBuilderParams {
    /// Creates parameters for the named service with everything else unset.
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            agent: None,
            trace_id: None,
            logger: None,
            config: None,
        }
    }

    /// Sets the default `User-Agent` header value.
    pub fn agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }

    /// Sets the default `Trace-Id` header value.
    pub fn trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Supplies the logging collaborator.
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Supplies caller configuration, deep-merged over the defaults.
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }
}

/// Builder for outbound HTTP clients with consistent cross-cutting
/// behavior.
///
/// Construction configures the underlying client (timeout, default
/// headers); the five chainable `add_*` methods accumulate optional
/// behaviors; [`build`](Self::build) installs them and hands over the
/// finished [`Client`]. The builder is consumed by `build`, so it cannot
/// be finalized twice.
///
/// # Examples
///
/// ```no_run
/// use gatehouse::{Authorization, ClientBuilder, ClientBuilderParams, Config, TracingLogger};
/// use std::sync::Arc;
///
/// # fn example() -> Result<(), gatehouse::Error> {
/// let client = ClientBuilder::new(
///     ClientBuilderParams::new("catalog")
///         .agent("catalog/1.0")
///         .logger(Arc::new(TracingLogger))
///         .config(Config::new().base_url("https://api.example.com")?),
/// )?
/// .add_5xx_error_handling()
/// .add_404_error_handling()
/// .add_auth_error_handling()
/// .add_request_logging()?
/// .add_authorization(Authorization::dynamic(|| "Bearer fresh".to_string()))
/// .build();
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    http: reqwest::Client,
    base_url: Option<Url>,
    service: String,
    logger: Option<Arc<dyn Logger>>,
    log_requests: bool,
    authorization: Option<Authorization>,
    default_authorization: bool,
    error_chain: Vec<ErrorInterceptor>,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field("service", &self.service)
            .field("logger", &self.logger.as_ref().map(|_| "..."))
            .field("log_requests", &self.log_requests)
            .field("authorization", &self.authorization)
            .field("default_authorization", &self.default_authorization)
            .field("error_chain", &self.error_chain)
            .finish()
    }
}

impl ClientBuilder {
    /// Creates a builder for the given parameters.
    ///
    /// The underlying client starts from a 3000 ms timeout plus `Trace-Id`
    /// and `User-Agent` default headers (each only when the corresponding
    /// parameter is given); `params.config` is deep-merged on top, so
    /// caller values win on conflicting keys while unspecified defaults
    /// survive.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if a header value is invalid or the
    /// underlying client cannot be constructed.
    pub fn new(params: ClientBuilderParams) -> Result<Self> {
        let ClientBuilderParams {
            service,
            agent,
            trace_id,
            logger,
            config,
        } = params;

        let mut default_headers = HeaderMap::new();
        if let Some(trace_id) = trace_id {
            let value = HeaderValue::from_str(&trace_id)
                .map_err(|e| Error::Configuration(format!("Invalid Trace-Id value: {}", e)))?;
            default_headers.insert(TRACE_ID, value);
        }
        if let Some(agent) = agent {
            let value = HeaderValue::from_str(&agent)
                .map_err(|e| Error::Configuration(format!("Invalid User-Agent value: {}", e)))?;
            default_headers.insert(USER_AGENT, value);
        }

        let defaults = Config {
            base_url: None,
            timeout: Some(DEFAULT_TIMEOUT),
            headers: default_headers,
        };
        let config = config.unwrap_or_default().merged_over(defaults);
        let default_authorization = config.headers.contains_key(AUTHORIZATION);

        let mut http = reqwest::Client::builder().default_headers(config.headers);
        if let Some(timeout) = config.timeout {
            http = http.timeout(timeout);
        }
        let http = http
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url,
            service,
            logger,
            log_requests: false,
            authorization: None,
            default_authorization,
            error_chain: Vec::new(),
        })
    }

    /// Adds handling that normalizes timeouts to 504 Gateway Timeout and
    /// other 5xx (or response-less transport) failures to 502 Bad Gateway.
    pub fn add_5xx_error_handling(mut self) -> Self {
        self.error_chain.push(ErrorInterceptor::GatewayErrors);
        self
    }

    /// Adds handling that normalizes upstream 404 responses to a generic
    /// 404 Not Found.
    pub fn add_404_error_handling(mut self) -> Self {
        self.error_chain.push(ErrorInterceptor::NotFound);
        self
    }

    /// Adds handling that re-signals upstream 401/403 responses with their
    /// status and the JSON-serialized response body as the message.
    pub fn add_auth_error_handling(mut self) -> Self {
        self.error_chain.push(ErrorInterceptor::AuthErrors);
        self
    }

    /// Enables request/response/error logging through the configured
    /// logger.
    ///
    /// Logging is observational only: it never alters the request, the
    /// response, or the error that propagates to the caller.
    ///
    /// # Errors
    ///
    /// Fails immediately if no logger was supplied at construction.
    pub fn add_request_logging(mut self) -> Result<Self> {
        if self.logger.is_none() {
            return Err(Error::Configuration("No logger configured".to_string()));
        }
        self.log_requests = true;
        Ok(self)
    }

    /// Adds an `Authorization` header source applied to every request that
    /// does not already carry an explicit `Authorization` header.
    ///
    /// Accepts a static value (`&str`/`String`) or
    /// [`Authorization::dynamic`] for a per-request generator.
    pub fn add_authorization(mut self, auth: impl Into<Authorization>) -> Self {
        self.authorization = Some(auth.into());
        self
    }

    /// Installs the accumulated error interceptors, in registration order,
    /// and returns the ready client.
    ///
    /// Consumes the builder; the configuration is frozen from here on.
    pub fn build(self) -> Client {
        Client {
            inner: Arc::new(ClientInner {
                http: self.http,
                base_url: self.base_url,
                service: self.service,
                logger: self.logger,
                log_requests: self.log_requests,
                authorization: self.authorization,
                default_authorization: self.default_authorization,
                error_chain: self.error_chain,
            }),
        }
    }
}

/// A ready-to-use HTTP client produced by [`ClientBuilder::build`].
///
/// Cheap to clone and safe to share across tasks; all configuration is
/// frozen behind an `Arc`.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: Option<Url>,
    service: String,
    logger: Option<Arc<dyn Logger>>,
    log_requests: bool,
    authorization: Option<Authorization>,
    default_authorization: bool,
    error_chain: Vec<ErrorInterceptor>,
}

impl Client {
    /// Makes a typed HTTP request.
    ///
    /// Every request goes through this path: URL resolution, request-phase
    /// hooks (logging, authorization), dispatch, response hooks, and the
    /// error-translation chain.
    ///
    /// # Type Parameters
    ///
    /// * `Req` - The request body type (must implement `Serialize`)
    /// * `Res` - The response body type (must implement `DeserializeOwned`)
    pub async fn call<Req, Res>(
        &self,
        metadata: RequestMetadata,
        body: Option<&Req>,
    ) -> Result<Response<Res>>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let start = Instant::now();
        let mut url = self.resolve_url(&metadata.path)?;
        for (key, value) in &metadata.query_params {
            url.query_pairs_mut().append_pair(key, value);
        }

        if self.inner.log_requests {
            if let Some(logger) = &self.inner.logger {
                logger.info(&Record::request(
                    &self.inner.service,
                    metadata.method.as_str(),
                    self.host(),
                    &metadata.path,
                ));
            }
        }

        tracing::debug!(
            method = %metadata.method,
            url = %url,
            "Executing HTTP request"
        );

        let mut request = self.inner.http.request(metadata.method.clone(), url);

        let mut headers = metadata.headers.clone();
        if let Some(auth) = &self.inner.authorization {
            // Explicit caller headers and default-config credentials win.
            if !headers.contains_key(AUTHORIZATION) && !self.inner.default_authorization {
                let value = HeaderValue::from_str(&auth.value()).map_err(|e| {
                    Error::Configuration(format!("Invalid Authorization value: {}", e))
                })?;
                headers.insert(AUTHORIZATION, value);
            }
        }
        request = request.headers(headers);

        if let Some(body) = body {
            request = request.json(body);
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    if self.inner.log_requests {
                        if let Some(logger) = &self.inner.logger {
                            logger.info(&Record::response(
                                &self.inner.service,
                                metadata.method.as_str(),
                                self.host(),
                                &metadata.path,
                                status.as_u16(),
                            ));
                        }
                    }
                    self.parse_response(response, start.elapsed()).await
                } else {
                    let headers = response.headers().clone();
                    let body = response.text().await.unwrap_or_default();
                    tracing::warn!(
                        status = status.as_u16(),
                        method = %metadata.method,
                        path = %metadata.path,
                        "Request failed"
                    );
                    Err(self.fail(Error::Upstream {
                        status,
                        body,
                        headers: Box::new(headers),
                    }))
                }
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    method = %metadata.method,
                    path = %metadata.path,
                    "Request failed"
                );
                Err(self.fail(Error::Network(e)))
            }
        }
    }

    /// Runs the response-error hooks over a native failure: the logging
    /// hook first (it sees the untranslated error), then the
    /// error-translation chain in registration order.
    fn fail(&self, error: Error) -> Error {
        if self.inner.log_requests {
            if let Some(logger) = &self.inner.logger {
                logger.error(&Record::failure(
                    &self.inner.service,
                    error.status().map(|s| s.as_u16()),
                    error.to_string(),
                    error.body().map(str::to_string),
                ));
            }
        }
        self.inner
            .error_chain
            .iter()
            .fold(error, |err, interceptor| interceptor.apply(err))
    }

    /// Parses a successful response body into the requested type.
    async fn parse_response<Res>(
        &self,
        response: reqwest::Response,
        latency: Duration,
    ) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        let status = response.status();
        let headers = response.headers().clone();
        let raw_body = response
            .text()
            .await
            .map_err(|e| self.fail(Error::Network(e)))?;

        match serde_json::from_str::<Res>(&raw_body) {
            Ok(data) => Ok(Response::new(data, raw_body, status, headers, latency)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    raw_response = %raw_body,
                    "Failed to deserialize response"
                );
                Err(Error::Deserialization {
                    raw_response: raw_body,
                    serde_error: e.to_string(),
                    status,
                })
            }
        }
    }

    /// Resolves a request path against the configured base URL.
    ///
    /// Absolute URLs are used as-is; relative paths require a base URL.
    fn resolve_url(&self, path: &str) -> Result<Url> {
        if let Ok(url) = Url::parse(path) {
            return Ok(url);
        }
        match &self.inner.base_url {
            Some(base) => Ok(base.join(path)?),
            None => Err(Error::Configuration(format!(
                "No base URL configured for relative path: {}",
                path
            ))),
        }
    }

    /// The configured base URL as logged in the `host` field.
    fn host(&self) -> Option<String> {
        self.inner
            .base_url
            .as_ref()
            .map(|url| url.as_str().trim_end_matches('/').to_string())
    }

    /// Makes a GET request to the specified path.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gatehouse::{ClientBuilder, ClientBuilderParams, Config};
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct User { name: String }
    ///
    /// # async fn example() -> Result<(), gatehouse::Error> {
    /// let client = ClientBuilder::new(
    ///     ClientBuilderParams::new("users")
    ///         .config(Config::new().base_url("https://api.example.com")?),
    /// )?
    /// .build();
    ///
    /// let user = client.get::<User>("/users/123").await?;
    /// println!("User: {}", user.data.name);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get<Res>(&self, path: impl Into<String>) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        let metadata = RequestMetadata::new(Method::GET, path);
        self.call::<(), Res>(metadata, None).await
    }

    /// Makes a POST request to the specified path with a JSON body.
    pub async fn post<Req, Res>(&self, path: impl Into<String>, body: &Req) -> Result<Response<Res>>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let metadata = RequestMetadata::new(Method::POST, path);
        self.call(metadata, Some(body)).await
    }

    /// Makes a PUT request to the specified path with a JSON body.
    pub async fn put<Req, Res>(&self, path: impl Into<String>, body: &Req) -> Result<Response<Res>>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let metadata = RequestMetadata::new(Method::PUT, path);
        self.call(metadata, Some(body)).await
    }

    /// Makes a DELETE request to the specified path.
    pub async fn delete<Res>(&self, path: impl Into<String>) -> Result<Response<Res>>
    where
        Res: DeserializeOwned,
    {
        let metadata = RequestMetadata::new(Method::DELETE, path);
        self.call::<(), Res>(metadata, None).await
    }

    /// Makes a PATCH request to the specified path with a JSON body.
    pub async fn patch<Req, Res>(
        &self,
        path: impl Into<String>,
        body: &Req,
    ) -> Result<Response<Res>>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let metadata = RequestMetadata::new(Method::PATCH, path);
        self.call(metadata, Some(body)).await
    }
}
