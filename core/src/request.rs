//! Fluent configuration for a single outbound request.
//!
//! # Design
//! `HttpRequest` is an owned builder: every `with_*`, `as_*` and `on_*` call
//! changes one concern and hands the builder back. Nothing is validated while
//! configuring. Conflicts (raw body plus post data) and failures recorded by
//! a setter (an unparsable URL, a serializer error) are reported as a
//! `ConfigError` when the request is assembled.
//!
//! Executing a request borrows the builder, so it can be executed again and
//! keeps all of its headers, cookies and query parameters between runs. A
//! builder is not meant to be shared between threads that execute it
//! concurrently.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use serde::Serialize;
use ureq::http::header::{AUTHORIZATION, CONNECTION, CONTENT_TYPE, COOKIE};
use ureq::http::Request;
use url::Url;

use crate::codec::{self, CONTENT_TYPE_FORM, CONTENT_TYPE_JSON, CONTENT_TYPE_XML};
use crate::error::{CodecError, ConfigError};
use crate::hooks::{CreateTransportHook, MockHandler, MockedResponse, RequestHook, ResponseHook};
use crate::http::{Cookie, HttpMethod, RequestMeta, Values};
use crate::log::{LogLevel, Logger, TracingLogger};
use crate::meta::ResponseMeta;
use crate::target;
use crate::transport::Transport;

/// Accumulated configuration for one logical HTTP request.
pub struct HttpRequest {
    pub(crate) scheme: String,
    pub(crate) host: String,
    pub(crate) path: String,
    pub(crate) query: Values,
    pub(crate) headers: Values,
    pub(crate) post_data: Values,
    pub(crate) cookies: Vec<Cookie>,
    pub(crate) basic_auth_username: String,
    pub(crate) basic_auth_password: String,
    pub(crate) verb: HttpMethod,
    pub(crate) content_type: String,
    pub(crate) timeout: Option<Duration>,
    pub(crate) tls_cert_path: String,
    pub(crate) tls_key_path: String,
    pub(crate) body: Vec<u8>,
    pub(crate) keep_alive: bool,
    pub(crate) label: String,
    pub(crate) logger: Option<Arc<dyn Logger>>,
    pub(crate) log_level: LogLevel,
    pub(crate) transport: Option<Arc<Transport>>,
    pub(crate) create_transport_hook: Option<CreateTransportHook>,
    pub(crate) response_hook: Option<ResponseHook>,
    pub(crate) request_hook: Option<RequestHook>,
    pub(crate) mock_handler: Option<MockHandler>,
    url_error: Option<(String, url::ParseError)>,
    body_error: Option<CodecError>,
}

impl Default for HttpRequest {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: String::new(),
            path: String::new(),
            query: Values::new(),
            headers: Values::new(),
            post_data: Values::new(),
            cookies: Vec::new(),
            basic_auth_username: String::new(),
            basic_auth_password: String::new(),
            verb: HttpMethod::Get,
            content_type: String::new(),
            timeout: None,
            tls_cert_path: String::new(),
            tls_key_path: String::new(),
            body: Vec::new(),
            keep_alive: false,
            label: String::new(),
            logger: None,
            log_level: LogLevel::Errors,
            transport: None,
            create_transport_hook: None,
            response_hook: None,
            request_hook: None,
            mock_handler: None,
            url_error: None,
            body_error: None,
        }
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("label", &self.label)
            .field("verb", &self.verb)
            .field("scheme", &self.scheme)
            .field("host", &self.host)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("headers", &self.headers)
            .field("cookies", &self.cookies)
            .field("post_data", &self.post_data)
            .field("body_len", &self.body.len())
            .field("timeout", &self.timeout)
            .field("keep_alive", &self.keep_alive)
            .field("log_level", &self.log_level)
            .field("mocked", &self.mock_handler.is_some())
            .finish_non_exhaustive()
    }
}

impl HttpRequest {
    /// An empty request: `GET http://` with nothing else set.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Hooks
    // -----------------------------------------------------------------------

    /// Receive the response metadata and body once the body has been read.
    pub fn on_response<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ResponseMeta, &[u8]) + Send + Sync + 'static,
    {
        self.response_hook = Some(Arc::new(hook));
        self
    }

    /// Adjust a freshly built transport before its first use.
    pub fn on_create_transport<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Url, &mut Transport) + Send + Sync + 'static,
    {
        self.create_transport_hook = Some(Arc::new(hook));
        self
    }

    /// Observe the request just before it is sent.
    pub fn on_request<F>(mut self, hook: F) -> Self
    where
        F: Fn(&RequestMeta) + Send + Sync + 'static,
    {
        self.request_hook = Some(Arc::new(hook));
        self
    }

    /// Answer matching requests from `handler` instead of the network.
    pub fn with_mocked_response<F>(mut self, handler: F) -> Self
    where
        F: Fn(&HttpMethod, &Url) -> Option<MockedResponse> + Send + Sync + 'static,
    {
        self.mock_handler = Some(Arc::new(handler));
        self
    }

    // -----------------------------------------------------------------------
    // Logging
    // -----------------------------------------------------------------------

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Log errors through `tracing`.
    pub fn with_logging(self) -> Self {
        self.with_logger(LogLevel::Errors, TracingLogger)
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_logger(mut self, level: LogLevel, logger: impl Logger + 'static) -> Self {
        self.log_level = level;
        self.logger = Some(Arc::new(logger));
        self
    }

    pub(crate) fn log(&self, level: LogLevel, message: fmt::Arguments<'_>) {
        if let Some(logger) = &self.logger {
            if level <= self.log_level {
                logger.log(level, &self.label, &message.to_string());
            }
        }
    }

    // -----------------------------------------------------------------------
    // Transport
    // -----------------------------------------------------------------------

    /// Use `transport` as is for every execution.
    pub fn with_transport(mut self, transport: impl Into<Arc<Transport>>) -> Self {
        self.transport = Some(transport.into());
        self
    }

    /// Keep connections open between requests and send `Connection: keep-alive`.
    pub fn with_keep_alives(mut self) -> Self {
        self.keep_alive = true;
        self.with_header(CONNECTION.as_str(), "keep-alive")
    }

    /// Bound the whole exchange, from dial to the last body byte. Zero disables it.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// PEM file holding the client certificate chain.
    pub fn with_tls_cert(mut self, cert_path: impl Into<String>) -> Self {
        self.tls_cert_path = cert_path.into();
        self
    }

    /// PEM file holding the client private key.
    pub fn with_tls_key(mut self, key_path: impl Into<String>) -> Self {
        self.tls_key_path = key_path.into();
        self
    }

    // -----------------------------------------------------------------------
    // Target
    // -----------------------------------------------------------------------

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Host, optionally with `:port`.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the path from format arguments, e.g. `format_args!("/users/{id}")`.
    pub fn with_pathf(self, args: fmt::Arguments<'_>) -> Self {
        self.with_path(args.to_string())
    }

    /// Set the path by joining `components` with `/`.
    pub fn with_combined_path<S: AsRef<str>>(self, components: &[S]) -> Self {
        self.with_path(target::combine_path_components(components))
    }

    /// Set scheme, host, path and query parameters from a full URL.
    ///
    /// Existing query parameters are replaced. An unparsable URL is reported
    /// when the request is assembled.
    pub fn with_url(mut self, raw: &str) -> Self {
        match Url::parse(raw) {
            Ok(url) => {
                self.url_error = None;
                self.scheme = url.scheme().to_string();
                self.host = target::host_with_port(&url);
                self.path = url.path().to_string();
                self.query = Values::new();
                for (key, value) in target::parse_query(url.query().unwrap_or_default()) {
                    self.query.set(key, value);
                }
            }
            Err(err) => self.url_error = Some((raw.to_string(), err)),
        }
        self
    }

    pub fn with_query_string(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.add(field, value);
        self
    }

    // -----------------------------------------------------------------------
    // Headers, cookies, auth
    // -----------------------------------------------------------------------

    /// Set a header, replacing earlier values. Names are case-insensitive.
    pub fn with_header(mut self, field: &str, value: impl Into<String>) -> Self {
        self.headers.set(field.to_ascii_lowercase(), value);
        self
    }

    pub fn with_cookie(mut self, cookie: Cookie) -> Self {
        self.cookies.push(cookie);
        self
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.basic_auth_username = username.into();
        self.basic_auth_password = password.into();
        self
    }

    /// Override the `Content-Type` header.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    // -----------------------------------------------------------------------
    // Verb
    // -----------------------------------------------------------------------

    pub fn with_verb(mut self, verb: impl Into<HttpMethod>) -> Self {
        self.verb = verb.into();
        self
    }

    pub fn as_get(self) -> Self {
        self.with_verb(HttpMethod::Get)
    }

    pub fn as_post(self) -> Self {
        self.with_verb(HttpMethod::Post)
    }

    pub fn as_put(self) -> Self {
        self.with_verb(HttpMethod::Put)
    }

    pub fn as_patch(self) -> Self {
        self.with_verb(HttpMethod::Patch)
    }

    pub fn as_delete(self) -> Self {
        self.with_verb(HttpMethod::Delete)
    }

    // -----------------------------------------------------------------------
    // Body
    // -----------------------------------------------------------------------

    /// Add a form field. Post data cannot be combined with a raw body.
    pub fn with_post_data(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.post_data.add(field, value);
        self
    }

    /// Add one form field per top-level member of `object`.
    ///
    /// Unlike `with_json_body`, the object becomes individual form fields.
    pub fn with_post_data_from_object<T: Serialize + ?Sized>(mut self, object: &T) -> Self {
        match codec::to_form_fields(object) {
            Ok(fields) => {
                for (key, value) in fields.pairs() {
                    self.post_data.add(key, value);
                }
            }
            Err(err) => self.body_error = Some(err),
        }
        self
    }

    pub fn with_raw_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self.body_error = None;
        self
    }

    /// Set the body to the output of `serialize`.
    pub fn with_serialized_body<T, F>(self, object: &T, serialize: F) -> Self
    where
        T: ?Sized,
        F: FnOnce(&T) -> Result<Vec<u8>, CodecError>,
    {
        match serialize(object) {
            Ok(body) => self.with_raw_body(body),
            Err(err) => {
                let mut request = self.with_raw_body(Vec::new());
                request.body_error = Some(err);
                request
            }
        }
    }

    pub fn with_json_body<T: Serialize + ?Sized>(self, object: &T) -> Self {
        self.with_serialized_body(object, codec::to_json)
            .with_content_type(CONTENT_TYPE_JSON)
    }

    pub fn with_xml_body<T: Serialize + ?Sized>(self, object: &T) -> Self {
        self.with_serialized_body(object, codec::to_xml)
            .with_content_type(CONTENT_TYPE_XML)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn verb(&self) -> &HttpMethod {
        &self.verb
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &Values {
        &self.query
    }

    pub fn post_data(&self) -> &Values {
        &self.post_data
    }

    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn keep_alive(&self) -> bool {
        self.keep_alive
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub(crate) fn uses_tls_client_cert(&self) -> bool {
        !self.tls_cert_path.is_empty() && !self.tls_key_path.is_empty()
    }

    // -----------------------------------------------------------------------
    // Assembly
    // -----------------------------------------------------------------------

    /// The target URL for the current configuration.
    pub fn create_url(&self) -> Result<Url, ConfigError> {
        if let Some((url, source)) = &self.url_error {
            return Err(ConfigError::InvalidUrl {
                url: url.clone(),
                source: *source,
            });
        }
        target::build_url(&self.scheme, &self.host, &self.path, &self.query)
    }

    /// The raw body if set, otherwise the encoded post data, otherwise `None`.
    pub fn request_body(&self) -> Option<Vec<u8>> {
        if !self.body.is_empty() {
            Some(self.body.clone())
        } else if !self.post_data.is_empty() {
            Some(self.post_data.encode().into_bytes())
        } else {
            None
        }
    }

    /// Explicit headers plus the inferred `Content-Type`.
    ///
    /// Post data implies form encoding; an explicit content type wins over both.
    pub fn headers(&self) -> Values {
        let mut headers = self.headers.clone();
        let content_type = CONTENT_TYPE.as_str();
        if !self.post_data.is_empty() {
            headers.set(content_type, CONTENT_TYPE_FORM);
        }
        if !self.content_type.is_empty() {
            headers.set(content_type, self.content_type.clone());
        }
        headers
    }

    /// Snapshot handed to the pre-request hook.
    pub fn request_meta(&self) -> Result<RequestMeta, ConfigError> {
        Ok(RequestMeta {
            verb: self.verb.clone(),
            url: self.create_url()?,
            headers: self.headers(),
            body: self.request_body(),
        })
    }

    /// Build the wire request without sending it.
    pub fn create_http_request(&self) -> Result<Request<Vec<u8>>, ConfigError> {
        if !self.body.is_empty() && !self.post_data.is_empty() {
            return Err(ConfigError::BodyAndPostData);
        }
        if let Some(err) = &self.body_error {
            return Err(ConfigError::Serialize(err.clone()));
        }
        let url = self.create_url()?;

        let mut builder = Request::builder().method(self.verb.as_str()).uri(url.as_str());

        if !self.basic_auth_username.is_empty() {
            let credentials = format!("{}:{}", self.basic_auth_username, self.basic_auth_password);
            builder = builder.header(AUTHORIZATION, format!("Basic {}", BASE64_STANDARD.encode(credentials)));
        }

        if !self.cookies.is_empty() {
            let cookies: Vec<String> = self.cookies.iter().map(Cookie::to_string).collect();
            builder = builder.header(COOKIE, cookies.join("; "));
        }

        for (name, value) in self.headers().pairs() {
            builder = builder.header(name, value);
        }

        builder
            .body(self.request_body().unwrap_or_default())
            .map_err(ConfigError::InvalidRequest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_pairs(request: &Request<Vec<u8>>) -> Vec<(String, String)> {
        request
            .headers()
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_str().unwrap().to_string()))
            .collect()
    }

    #[test]
    fn new_request_defaults() {
        let request = HttpRequest::new();
        assert_eq!(request.scheme(), "http");
        assert_eq!(request.verb(), &HttpMethod::Get);
        assert!(!request.keep_alive());
        assert!(request.timeout().is_none());
        assert!(request.request_body().is_none());
    }

    #[test]
    fn verb_shorthands_only_set_the_verb() {
        let request = HttpRequest::new().with_host("example.com").as_patch();
        assert_eq!(request.verb(), &HttpMethod::Patch);
        assert_eq!(request.host(), "example.com");
        assert_eq!(HttpRequest::new().as_delete().verb(), &HttpMethod::Delete);
        assert_eq!(HttpRequest::new().as_put().verb(), &HttpMethod::Put);
        assert_eq!(HttpRequest::new().as_post().as_get().verb(), &HttpMethod::Get);
    }

    #[test]
    fn with_url_splits_all_parts() {
        let request = HttpRequest::new().with_url("https://api.example.com:8443/v1/users?limit=10&active");
        assert_eq!(request.scheme(), "https");
        assert_eq!(request.host(), "api.example.com:8443");
        assert_eq!(request.path(), "/v1/users");
        assert_eq!(request.query().get("limit"), Some("10"));
        assert_eq!(request.query().get("active"), Some(""));
    }

    #[test]
    fn with_url_replaces_previous_query() {
        let request = HttpRequest::new()
            .with_query_string("stale", "1")
            .with_url("http://localhost/x?a=1&a=2");
        assert!(!request.query().contains_key("stale"));
        assert_eq!(request.query().get_all("a").to_vec(), vec!["2".to_string()]);
    }

    #[test]
    fn bad_url_is_reported_at_assembly() {
        let request = HttpRequest::new().with_url("::not a url::");
        let err = request.create_http_request().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));

        let fixed = request.with_url("http://localhost/");
        assert!(fixed.create_http_request().is_ok());
    }

    #[test]
    fn combined_path_is_normalized() {
        let request = HttpRequest::new()
            .with_host("localhost")
            .with_combined_path(&["/api/", "/v2/", "items"]);
        assert_eq!(request.path(), "api/v2/items");
        assert_eq!(request.create_url().unwrap().as_str(), "http://localhost/api/v2/items");
    }

    #[test]
    fn pathf_formats_the_path() {
        let id = 42;
        let request = HttpRequest::new().with_pathf(format_args!("/users/{id}/posts"));
        assert_eq!(request.path(), "/users/42/posts");
    }

    #[test]
    fn create_url_is_idempotent() {
        let request = HttpRequest::new()
            .with_host("localhost:3000")
            .with_path("/search")
            .with_query_string("q", "rust lang")
            .with_query_string("page", "2");
        let first = request.create_url().unwrap();
        let second = request.create_url().unwrap();
        assert_eq!(first.as_str(), "http://localhost:3000/search?page=2&q=rust+lang");
        assert_eq!(first, second);
    }

    #[test]
    fn body_and_post_data_conflict() {
        let request = HttpRequest::new()
            .with_host("localhost")
            .with_raw_body("raw")
            .with_post_data("field", "value");
        assert!(matches!(
            request.create_http_request().unwrap_err(),
            ConfigError::BodyAndPostData
        ));
    }

    #[test]
    fn post_data_implies_form_content_type() {
        let request = HttpRequest::new()
            .with_host("localhost")
            .as_post()
            .with_post_data("b", "2")
            .with_post_data("a", "1 1");
        let wire = request.create_http_request().unwrap();
        assert_eq!(wire.headers()[CONTENT_TYPE], CONTENT_TYPE_FORM);
        assert_eq!(wire.body(), b"a=1+1&b=2");
    }

    #[test]
    fn explicit_content_type_wins() {
        let request = HttpRequest::new()
            .with_host("localhost")
            .with_post_data("a", "1")
            .with_content_type("text/plain");
        assert_eq!(request.headers().get("content-type"), Some("text/plain"));
    }

    #[test]
    fn json_body_sets_content_type() {
        let request = HttpRequest::new()
            .with_host("localhost")
            .as_post()
            .with_json_body(&serde_json::json!({"name": "gear"}));
        let wire = request.create_http_request().unwrap();
        assert_eq!(wire.headers()[CONTENT_TYPE], CONTENT_TYPE_JSON);
        assert_eq!(wire.body(), br#"{"name":"gear"}"#);
    }

    #[test]
    fn xml_body_sets_content_type() {
        #[derive(Serialize)]
        struct Ping {
            seq: u32,
        }
        let request = HttpRequest::new().with_host("localhost").with_xml_body(&Ping { seq: 7 });
        let wire = request.create_http_request().unwrap();
        assert_eq!(wire.headers()[CONTENT_TYPE], CONTENT_TYPE_XML);
        assert_eq!(wire.body(), b"<Ping><seq>7</seq></Ping>");
    }

    #[test]
    fn serializer_failure_is_reported_at_assembly() {
        let request = HttpRequest::new()
            .with_host("localhost")
            .with_serialized_body("ignored", |_: &str| Err(CodecError::custom("refused")));
        assert!(matches!(
            request.create_http_request().unwrap_err(),
            ConfigError::Serialize(_)
        ));
    }

    #[test]
    fn custom_serializer_output_is_the_body() {
        let request = HttpRequest::new()
            .with_host("localhost")
            .with_serialized_body(&[1u8, 2, 3][..], |bytes: &[u8]| Ok(bytes.iter().rev().copied().collect()));
        assert_eq!(request.request_body(), Some(vec![3, 2, 1]));
    }

    #[test]
    fn post_data_from_object_adds_fields() {
        #[derive(Serialize)]
        struct Signup<'a> {
            email: &'a str,
            age: u8,
        }
        let request = HttpRequest::new().with_post_data_from_object(&Signup {
            email: "a@b.c",
            age: 30,
        });
        assert_eq!(request.post_data().get("email"), Some("a@b.c"));
        assert_eq!(request.post_data().get("age"), Some("30"));
    }

    #[test]
    fn auth_cookies_and_headers_reach_the_wire() {
        let request = HttpRequest::new()
            .with_host("localhost")
            .with_basic_auth("user", "pass")
            .with_cookie(Cookie::new("a", "1"))
            .with_cookie(Cookie::new("b", "2"))
            .with_header("X-Trace", "abc");
        let wire = request.create_http_request().unwrap();
        assert_eq!(wire.headers()[AUTHORIZATION], "Basic dXNlcjpwYXNz");
        assert_eq!(wire.headers()[COOKIE], "a=1; b=2");
        assert_eq!(wire.headers()["x-trace"], "abc");
    }

    #[test]
    fn keep_alives_set_flag_and_header() {
        let request = HttpRequest::new().with_keep_alives();
        assert!(request.keep_alive());
        assert_eq!(request.headers().get("connection"), Some("keep-alive"));
    }

    #[test]
    fn zero_timeout_means_no_timeout() {
        assert_eq!(HttpRequest::new().with_timeout(Duration::ZERO).timeout(), None);
        assert_eq!(
            HttpRequest::new().with_timeout(Duration::from_secs(2)).timeout(),
            Some(Duration::from_secs(2))
        );
    }

    #[test]
    fn tls_requires_both_paths() {
        assert!(!HttpRequest::new().with_tls_cert("cert.pem").uses_tls_client_cert());
        assert!(!HttpRequest::new().with_tls_key("key.pem").uses_tls_client_cert());
        assert!(HttpRequest::new()
            .with_tls_cert("cert.pem")
            .with_tls_key("key.pem")
            .uses_tls_client_cert());
    }

    #[test]
    fn independent_calls_commute() {
        let forward = HttpRequest::new()
            .with_scheme("https")
            .with_host("example.com")
            .with_path("/orders")
            .with_query_string("status", "open")
            .with_query_string("limit", "5")
            .with_header("Accept", "application/json")
            .with_header("X-Trace", "abc")
            .with_basic_auth("user", "pass")
            .with_cookie(Cookie::new("session", "s1"))
            .with_post_data("note", "hi")
            .as_post();
        let backward = HttpRequest::new()
            .as_post()
            .with_post_data("note", "hi")
            .with_cookie(Cookie::new("session", "s1"))
            .with_basic_auth("user", "pass")
            .with_header("X-Trace", "abc")
            .with_header("Accept", "application/json")
            .with_query_string("limit", "5")
            .with_query_string("status", "open")
            .with_path("/orders")
            .with_host("example.com")
            .with_scheme("https");

        let a = forward.create_http_request().unwrap();
        let b = backward.create_http_request().unwrap();
        assert_eq!(a.method(), b.method());
        assert_eq!(a.uri(), b.uri());
        assert_eq!(header_pairs(&a), header_pairs(&b));
        assert_eq!(a.body(), b.body());
        assert_eq!(forward.request_meta().unwrap(), backward.request_meta().unwrap());
    }

    #[test]
    fn invalid_verb_is_a_config_error() {
        let request = HttpRequest::new().with_host("localhost").with_verb("BAD VERB");
        assert!(matches!(
            request.create_http_request().unwrap_err(),
            ConfigError::InvalidRequest(_)
        ));
    }
}
