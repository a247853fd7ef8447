//! Error types for request assembly and execution.
//!
//! # Design
//! Every failure keeps its cause reachable through `source()`. Once a response
//! has been received, the error carries its `ResponseMeta` so callers can still
//! inspect status and headers when reading or decoding the body failed.

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::meta::ResponseMeta;

/// Boxed error returned by caller-supplied handlers.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors returned by `HttpRequest` execution methods.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The request could not be assembled; nothing was sent.
    #[error("invalid request configuration: {0}")]
    Config(#[from] ConfigError),

    /// Dialing, the TLS handshake, or the exchange itself failed.
    #[error("transport error: {0}")]
    Transport(#[source] Box<ureq::Error>),

    /// The response arrived but its body could not be read.
    #[error("reading response body failed (status {})", .meta.status_code)]
    Read {
        meta: Box<ResponseMeta>,
        #[source]
        source: io::Error,
    },

    /// The response body could not be decoded into the destination.
    #[error("decoding response body failed (status {})", .meta.status_code)]
    Decode {
        meta: Box<ResponseMeta>,
        #[source]
        source: CodecError,
    },

    /// A mocked response carried an error.
    #[error("mocked response reported an error: {source}")]
    Handler {
        meta: Box<ResponseMeta>,
        #[source]
        source: BoxError,
    },
}

impl RequestError {
    /// Metadata of the response, when one was received or mocked.
    pub fn meta(&self) -> Option<&ResponseMeta> {
        match self {
            RequestError::Read { meta, .. }
            | RequestError::Decode { meta, .. }
            | RequestError::Handler { meta, .. } => Some(&**meta),
            RequestError::Config(_) | RequestError::Transport(_) => None,
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, RequestError::Config(_))
    }

    /// True when a configured timeout expired while sending or reading.
    pub fn is_timeout(&self) -> bool {
        match self {
            RequestError::Transport(err) => match &**err {
                ureq::Error::Timeout(_) => true,
                ureq::Error::Io(io_err) => io_err.kind() == io::ErrorKind::TimedOut,
                _ => false,
            },
            RequestError::Read { source, .. } => source.kind() == io::ErrorKind::TimedOut,
            _ => false,
        }
    }
}

impl From<ureq::Error> for RequestError {
    fn from(err: ureq::Error) -> Self {
        RequestError::Transport(Box::new(err))
    }
}

/// Problems found while assembling a request or building its transport.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot set both a raw body and post data")]
    BodyAndPostData,

    #[error("invalid target url `{url}`")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid request")]
    InvalidRequest(#[source] ureq::http::Error),

    #[error("failed to serialize request body")]
    Serialize(#[source] CodecError),

    #[error(transparent)]
    Tls(#[from] TlsError),
}

/// Failures loading the TLS client certificate and key.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("failed to read `{}`", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed PEM in `{}`", .path.display())]
    Pem {
        path: PathBuf,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("no certificate found in `{}`", .0.display())]
    MissingCertificate(PathBuf),

    #[error("no private key found in `{}`", .0.display())]
    MissingPrivateKey(PathBuf),
}

/// Serialization format a `CodecError` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecFormat {
    Json,
    Xml,
    Form,
    Custom,
}

impl fmt::Display for CodecFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CodecFormat::Json => "json",
            CodecFormat::Xml => "xml",
            CodecFormat::Form => "form",
            CodecFormat::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// A serializer or deserializer failure.
///
/// Cheap to clone so a failure recorded by a builder call can be reported
/// again every time the request is assembled.
#[derive(Debug, Clone)]
pub struct CodecError {
    format: CodecFormat,
    source: Arc<dyn StdError + Send + Sync + 'static>,
}

impl CodecError {
    pub fn new(format: CodecFormat, source: impl Into<BoxError>) -> Self {
        Self {
            format,
            source: Arc::from(source.into()),
        }
    }

    /// Wrap an arbitrary error from a caller-supplied codec.
    pub fn custom(source: impl Into<BoxError>) -> Self {
        Self::new(CodecFormat::Custom, source)
    }

    pub fn format(&self) -> CodecFormat {
        self.format
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} codec: {}", self.format, self.source)
    }
}

impl StdError for CodecError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&*self.source)
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        CodecError::new(CodecFormat::Json, err)
    }
}

impl From<quick_xml::DeError> for CodecError {
    fn from(err: quick_xml::DeError) -> Self {
        CodecError::new(CodecFormat::Xml, err)
    }
}

impl From<quick_xml::SeError> for CodecError {
    fn from(err: quick_xml::SeError) -> Self {
        CodecError::new(CodecFormat::Xml, err)
    }
}
