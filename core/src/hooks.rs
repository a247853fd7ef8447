//! Event hooks and the mock interceptor.
//!
//! Each hook slot on `HttpRequest` is optional. An empty slot is skipped, it is
//! never replaced by a default no-op.

use std::sync::Arc;

use url::Url;

use crate::error::BoxError;
use crate::http::{HttpMethod, RequestMeta, Values};
use crate::meta::ResponseMeta;
use crate::transport::Transport;

/// Fired before the request is sent (or mocked).
pub type RequestHook = Arc<dyn Fn(&RequestMeta) + Send + Sync>;

/// Fired once the response body has been read in full.
pub type ResponseHook = Arc<dyn Fn(&ResponseMeta, &[u8]) + Send + Sync>;

/// Fired after a transport has been built and before its first use.
pub type CreateTransportHook = Arc<dyn Fn(&Url, &mut Transport) + Send + Sync>;

/// Returns `Some` to answer the request without touching the network.
pub type MockHandler = Arc<dyn Fn(&HttpMethod, &Url) -> Option<MockedResponse> + Send + Sync>;

/// A response synthesized by a mock handler.
#[derive(Debug)]
pub struct MockedResponse {
    pub status_code: u16,
    pub headers: Values,
    pub body: Vec<u8>,
    pub error: Option<BoxError>,
}

impl MockedResponse {
    pub fn new(status_code: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status_code,
            headers: Values::new(),
            body: body.into(),
            error: None,
        }
    }

    /// A 200 response carrying `body` as `application/json`.
    pub fn json(body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, body).with_header("Content-Type", crate::codec::CONTENT_TYPE_JSON)
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.add(name.to_ascii_lowercase(), value);
        self
    }

    /// Make the execution fail with `error` after the response is synthesized.
    pub fn with_error(mut self, error: impl Into<BoxError>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Metadata exactly as a live response with these headers would produce.
    pub(crate) fn meta(&self) -> ResponseMeta {
        let mut meta = ResponseMeta::from_parts(self.status_code, self.headers.clone());
        meta.content_length = Some(self.body.len() as u64);
        meta
    }
}
