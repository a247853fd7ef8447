//! Fluent, synchronous HTTP requests.
//!
//! # Overview
//! An `HttpRequest` is configured with chained calls and then executed on the
//! calling thread. Executions return the raw response, the body as text, or
//! the body decoded from JSON or XML (or through any `Deserializer`), always
//! together with a normalized `ResponseMeta`.
//!
//! ```no_run
//! use request_core::HttpRequest;
//!
//! # fn main() -> Result<(), request_core::RequestError> {
//! let status: serde_json::Value = HttpRequest::new()
//!     .with_url("https://api.example.com/v1/status")
//!     .with_header("Accept", "application/json")
//!     .fetch_json()?;
//! # let _ = status;
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! - The builder owns its configuration; executions borrow it, so one request
//!   can be sent repeatedly.
//! - Configuration never fails eagerly. Problems surface as `ConfigError`
//!   when the request is assembled, before any network activity.
//! - A mock handler can answer requests in-process. Mocked responses go
//!   through the same metadata and decoding path as live ones.
//! - Logging goes through an explicit `Logger`; the crate never installs a
//!   global subscriber.

pub mod client;
pub mod codec;
pub mod error;
pub mod hooks;
pub mod http;
pub mod log;
pub mod meta;
pub mod request;
pub mod target;
pub mod transport;

pub use codec::{Deserializer, Json, Raw, Xml};
pub use error::{BoxError, CodecError, CodecFormat, ConfigError, RequestError, TlsError};
pub use hooks::MockedResponse;
pub use http::{Cookie, HttpMethod, RequestMeta, Values};
pub use log::{LogLevel, Logger, TracingLogger};
pub use meta::{RawResponse, ResponseBody, ResponseMeta};
pub use request::HttpRequest;
pub use target::combine_path_components;
pub use transport::{Transport, KEEP_ALIVE_INTERVAL};
