//! Execution: sending an assembled `HttpRequest` and decoding what comes back.
//!
//! # Design
//! Every operation funnels through `fetch_raw_response`, which assembles the
//! request, fires the pre-request hook, consults the mock handler and only
//! then resolves a transport. The convenience operations read the body in
//! full, correct the content length, fire the post-response hook and hand the
//! bytes to a `Deserializer`. The body stream is owned by `RawResponse`, so it
//! is released on every exit path by scope.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::codec::{self, Deserializer, Json, Xml};
use crate::error::{CodecError, ConfigError, RequestError};
use crate::log::LogLevel;
use crate::meta::{RawResponse, ResponseBody, ResponseMeta};
use crate::request::HttpRequest;
use crate::transport::{self, Transport, KEEP_ALIVE_INTERVAL};

impl HttpRequest {
    /// Send the request and return the response with its body unread.
    ///
    /// A mock handler that answers the request short-circuits the network. A
    /// mocked response carrying an error yields `RequestError::Handler`.
    pub fn fetch_raw_response(&self) -> Result<RawResponse, RequestError> {
        let request = self.create_http_request()?;
        self.log_request()?;

        if let Some(mock) = &self.mock_handler {
            let url = self.create_url()?;
            if let Some(mocked) = mock(&self.verb, &url) {
                let meta = mocked.meta();
                if let Some(source) = mocked.error {
                    return Err(RequestError::Handler {
                        meta: Box::new(meta),
                        source,
                    });
                }
                return Ok(RawResponse {
                    meta,
                    body: ResponseBody::Mocked(Cursor::new(mocked.body)),
                });
            }
        }

        let response = match self.resolve_transport()? {
            Some(custom) => transport::run(custom.agent(), request, self.timeout),
            None => transport::run(transport::default_agent(), request, self.timeout),
        }
        .map_err(|err| {
            self.log(LogLevel::Errors, format_args!("Service Request ==> {err}"));
            RequestError::from(err)
        })?;

        let (parts, body) = response.into_parts();
        Ok(RawResponse {
            meta: ResponseMeta::from_header_map(parts.status.as_u16(), &parts.headers),
            body: ResponseBody::Live(body.into_reader()),
        })
    }

    /// Send the request and discard the response.
    pub fn execute(&self) -> Result<(), RequestError> {
        self.execute_with_meta().map(|_| ())
    }

    /// Send the request and return the response metadata without reading the body.
    pub fn execute_with_meta(&self) -> Result<ResponseMeta, RequestError> {
        let RawResponse { meta, body } = self.fetch_raw_response()?;
        drop(body);
        Ok(meta)
    }

    pub fn fetch_string(&self) -> Result<String, RequestError> {
        self.fetch_string_with_meta().map(|(body, _)| body)
    }

    /// Body as text, invalid UTF-8 replaced, plus the response metadata.
    pub fn fetch_string_with_meta(&self) -> Result<(String, ResponseMeta), RequestError> {
        let (meta, body) = self.read_response()?;
        Ok((String::from_utf8_lossy(&body).into_owned(), meta))
    }

    /// Decode a JSON body into a new `T`.
    pub fn fetch_json<T: DeserializeOwned>(&self) -> Result<T, RequestError> {
        let (meta, body) = self.read_response()?;
        codec::from_json(&body).map_err(|source| decode_error(meta, source))
    }

    pub fn fetch_json_to_object<T: DeserializeOwned>(&self, destination: &mut T) -> Result<(), RequestError> {
        self.fetch_json_to_object_with_meta(destination).map(|_| ())
    }

    pub fn fetch_json_to_object_with_meta<T: DeserializeOwned>(
        &self,
        destination: &mut T,
    ) -> Result<ResponseMeta, RequestError> {
        self.fetch_object_with_deserializer(Json(destination))
    }

    /// Decode into `success` when the status is 200, otherwise into `error`.
    pub fn fetch_json_to_object_with_error_handler<T, E>(
        &self,
        success: &mut T,
        error: &mut E,
    ) -> Result<ResponseMeta, RequestError>
    where
        T: DeserializeOwned,
        E: DeserializeOwned,
    {
        self.decode_by_status(Some(&mut Json(success)), Some(&mut Json(error)))
    }

    /// Decode into `error` only when the status is not 200.
    pub fn fetch_json_error<E: DeserializeOwned>(&self, error: &mut E) -> Result<ResponseMeta, RequestError> {
        self.decode_by_status(None, Some(&mut Json(error)))
    }

    /// Decode an XML body into a new `T`.
    pub fn fetch_xml<T: DeserializeOwned>(&self) -> Result<T, RequestError> {
        let (meta, body) = self.read_response()?;
        codec::from_xml(&body).map_err(|source| decode_error(meta, source))
    }

    pub fn fetch_xml_to_object<T: DeserializeOwned>(&self, destination: &mut T) -> Result<(), RequestError> {
        self.fetch_xml_to_object_with_meta(destination).map(|_| ())
    }

    pub fn fetch_xml_to_object_with_meta<T: DeserializeOwned>(
        &self,
        destination: &mut T,
    ) -> Result<ResponseMeta, RequestError> {
        self.fetch_object_with_deserializer(Xml(destination))
    }

    pub fn fetch_xml_to_object_with_error_handler<T, E>(
        &self,
        success: &mut T,
        error: &mut E,
    ) -> Result<ResponseMeta, RequestError>
    where
        T: DeserializeOwned,
        E: DeserializeOwned,
    {
        self.decode_by_status(Some(&mut Xml(success)), Some(&mut Xml(error)))
    }

    /// Hand the full body to `deserializer`, whatever the status.
    pub fn fetch_object_with_deserializer(
        &self,
        mut deserializer: impl Deserializer,
    ) -> Result<ResponseMeta, RequestError> {
        let (meta, body) = self.read_response()?;
        match deserializer.deserialize(&body) {
            Ok(()) => Ok(meta),
            Err(source) => Err(decode_error(meta, source)),
        }
    }

    fn decode_by_status<'a>(
        &self,
        success: Option<&'a mut dyn Deserializer>,
        error: Option<&'a mut dyn Deserializer>,
    ) -> Result<ResponseMeta, RequestError> {
        let (meta, body) = self.read_response()?;
        let handler = if meta.is_ok() { success } else { error };
        match handler.map(|handler| handler.deserialize(&body)) {
            Some(Err(source)) => Err(decode_error(meta, source)),
            _ => Ok(meta),
        }
    }

    /// Fetch, read the whole body and report it to the response hook.
    fn read_response(&self) -> Result<(ResponseMeta, Vec<u8>), RequestError> {
        let (meta, read) = self.fetch_raw_response()?.read_all();
        let body = match read {
            Ok(body) => body,
            Err(source) => {
                self.log(LogLevel::Errors, format_args!("Service Response ==> {source}"));
                return Err(RequestError::Read {
                    meta: Box::new(meta),
                    source,
                });
            }
        };
        self.log_response(&meta, &body);
        Ok((meta, body))
    }

    fn log_request(&self) -> Result<(), ConfigError> {
        let meta = self.request_meta()?;
        if let Some(hook) = &self.request_hook {
            hook(&meta);
        }
        self.log(LogLevel::Verbose, format_args!("Service Request ==> {} {}", meta.verb, meta.url));
        Ok(())
    }

    fn log_response(&self, meta: &ResponseMeta, body: &[u8]) {
        if let Some(hook) = &self.response_hook {
            hook(meta, body);
        }
        self.log(
            LogLevel::Verbose,
            format_args!("Service Response ==> {}", String::from_utf8_lossy(body)),
        );
    }

    // -----------------------------------------------------------------------
    // Transport resolution
    // -----------------------------------------------------------------------

    pub(crate) fn requires_custom_transport(&self) -> bool {
        self.uses_tls_client_cert()
            || self.transport.is_some()
            || self.create_transport_hook.is_some()
            || self.keep_alive
    }

    /// The transport for this execution, or `None` for the shared default agent.
    fn resolve_transport(&self) -> Result<Option<Arc<Transport>>, ConfigError> {
        if !self.requires_custom_transport() {
            return Ok(None);
        }
        if let Some(transport) = &self.transport {
            self.log(LogLevel::Debug, format_args!("Service Request ==> Using Provided Transport"));
            return Ok(Some(Arc::clone(transport)));
        }
        self.create_transport().map(|transport| Some(Arc::new(transport)))
    }

    fn create_transport(&self) -> Result<Transport, ConfigError> {
        self.log(LogLevel::Debug, format_args!("Service Request ==> Creating Custom Transport"));

        let mut transport = Transport::new().with_keep_alive(self.keep_alive);
        transport.dial_timeout = self.timeout;
        if self.keep_alive {
            self.log(
                LogLevel::Debug,
                format_args!("Service Request ==> Transport Enabled For keep-alive {KEEP_ALIVE_INTERVAL:?}"),
            );
            transport = transport.with_keep_alive_interval(KEEP_ALIVE_INTERVAL);
        }

        if let Some(logger) = self.logger.clone().filter(|_| self.log_level >= LogLevel::Debug) {
            let label = self.label.clone();
            transport = transport.with_dial_hook(move |address| {
                logger.log(
                    LogLevel::Debug,
                    &label,
                    &format!("Service Request ==> Transport Is Dialing {address}"),
                );
                Ok(())
            });
        }

        if self.uses_tls_client_cert() {
            let cert = transport::load_client_cert(Path::new(&self.tls_cert_path), Path::new(&self.tls_key_path))?;
            transport = transport.with_client_cert(cert);
        }

        if let Some(hook) = &self.create_transport_hook {
            let url = self.create_url()?;
            hook(&url, &mut transport);
        }

        Ok(transport)
    }
}

fn decode_error(meta: ResponseMeta, source: CodecError) -> RequestError {
    RequestError::Decode {
        meta: Box::new(meta),
        source,
    }
}
