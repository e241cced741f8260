//! # Gatehouse - a builder for outbound HTTP clients
//!
//! Gatehouse lets internal services construct outbound HTTP clients with
//! consistent cross-cutting behavior (default headers, timeouts, error
//! translation, request logging, and authorization) without repeating
//! boilerplate at each call site. It wraps `reqwest`: transport, TLS,
//! connection pooling, and timeout enforcement stay the underlying
//! library's job.
//!
//! The core is the builder's composition model: chained configuration
//! calls accumulate an ordered list of interceptors, and [`ClientBuilder::build`]
//! installs them and returns a single callable [`Client`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use gatehouse::{ClientBuilder, ClientBuilderParams, Config, TracingLogger};
//! use serde::Deserialize;
//! use std::sync::Arc;
//!
//! #[derive(Deserialize)]
//! struct Item {
//!     id: u64,
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), gatehouse::Error> {
//!     let client = ClientBuilder::new(
//!         ClientBuilderParams::new("catalog")
//!             .agent("catalog-service/1.0")
//!             .trace_id("7f3a9c")
//!             .logger(Arc::new(TracingLogger))
//!             .config(Config::new().base_url("https://api.example.com")?),
//!     )?
//!     .add_5xx_error_handling()
//!     .add_404_error_handling()
//!     .add_request_logging()?
//!     .add_authorization("Bearer s3cr3t")
//!     .build();
//!
//!     let item = client.get::<Item>("/items/42").await?;
//!     println!("Item: {}", item.data.name);
//!     println!("Request took {:?}", item.latency);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Behaviors
//!
//! Each behavior is opt-in and chainable; composition order is
//! registration order:
//!
//! - **`add_5xx_error_handling`** - timeouts become 504 Gateway Timeout,
//!   other 5xx (and response-less transport) failures become 502 Bad
//!   Gateway. Upstream error bodies are deliberately discarded so callers
//!   cannot grow dependencies on them.
//! - **`add_404_error_handling`** - upstream 404s become a generic 404
//!   Not Found.
//! - **`add_auth_error_handling`** - upstream 401/403 keep their status
//!   and carry the JSON-serialized upstream body as the message.
//! - **`add_request_logging`** - one info record per request and
//!   successful response, one error record per failure, through the
//!   [`Logger`] supplied at construction. Purely observational.
//! - **`add_authorization`** - a static value or per-request generator
//!   for the `Authorization` header; explicit caller headers always win.
//!
//! ## Error Handling
//!
//! Failures that no interceptor claims pass through in their native
//! shape, with the upstream status and body preserved:
//!
//! ```no_run
//! use gatehouse::{ClientBuilder, ClientBuilderParams, Error};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = ClientBuilder::new(ClientBuilderParams::new("catalog"))?.build();
//! match client.get::<serde_json::Value>("https://api.example.com/items").await {
//!     Ok(response) => println!("{:?}", response.data),
//!     Err(Error::Http { status, message }) => {
//!         // Translated: exactly a message and a status code
//!         eprintln!("{} ({})", message, status);
//!     }
//!     Err(Error::Upstream { status, body, .. }) => {
//!         // Native upstream failure, untranslated
//!         eprintln!("{}: {}", status, body);
//!     }
//!     Err(e) => eprintln!("{}", e),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod interceptor;
pub mod logging;
pub mod metadata;
mod response;

pub use client::{Client, ClientBuilder, ClientBuilderParams};
pub use config::Config;
pub use error::{Error, Result};
pub use interceptor::Authorization;
pub use logging::{Logger, Record, TracingLogger};
pub use metadata::RequestMetadata;
pub use response::Response;
