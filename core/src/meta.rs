//! Normalized summary of an HTTP response, independent of body decoding.

use std::io::{self, Cursor, Read};

use ureq::http::header::{HeaderMap, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE};

use crate::http::Values;

/// Status, content description and headers of a live or mocked response.
///
/// Header names are stored lowercase. `content_length` starts as the declared
/// `Content-Length` and is replaced by the number of bytes actually read once
/// the body has been consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMeta {
    pub status_code: u16,
    pub content_length: Option<u64>,
    pub content_type: String,
    pub content_encoding: String,
    pub headers: Values,
}

impl ResponseMeta {
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            ..Self::default()
        }
    }

    /// Build from a status and a header map, deriving the content fields.
    pub fn from_parts(status_code: u16, headers: Values) -> Self {
        let joined = |name: &str| headers.get_all(name).join(";");
        Self {
            status_code,
            content_length: headers.get(CONTENT_LENGTH.as_str()).and_then(|len| len.trim().parse().ok()),
            content_type: joined(CONTENT_TYPE.as_str()),
            content_encoding: joined(CONTENT_ENCODING.as_str()),
            headers,
        }
    }

    pub(crate) fn from_header_map(status_code: u16, header_map: &HeaderMap) -> Self {
        let headers = header_map
            .iter()
            .map(|(name, value)| (name.as_str(), String::from_utf8_lossy(value.as_bytes()).into_owned()))
            .collect();
        Self::from_parts(status_code, headers)
    }

    /// Add a header and re-derive the content fields.
    pub fn with_header(self, name: &str, value: impl Into<String>) -> Self {
        let mut headers = self.headers;
        headers.add(name.to_ascii_lowercase(), value);
        Self::from_parts(self.status_code, headers)
    }

    pub fn is_ok(&self) -> bool {
        self.status_code == 200
    }
}

/// The unread body of a response.
///
/// Dropping it releases the underlying connection.
pub enum ResponseBody {
    Live(ureq::BodyReader<'static>),
    Mocked(Cursor<Vec<u8>>),
}

impl Read for ResponseBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            ResponseBody::Live(reader) => reader.read(buf),
            ResponseBody::Mocked(cursor) => cursor.read(buf),
        }
    }
}

impl std::fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseBody::Live(_) => f.write_str("ResponseBody::Live"),
            ResponseBody::Mocked(cursor) => write!(f, "ResponseBody::Mocked({} bytes)", cursor.get_ref().len()),
        }
    }
}

/// A response whose body has not been read yet.
#[derive(Debug)]
pub struct RawResponse {
    pub meta: ResponseMeta,
    pub body: ResponseBody,
}

impl RawResponse {
    /// Read the remaining body and correct `meta.content_length`.
    ///
    /// The body is dropped before returning, whether or not reading succeeded.
    pub fn read_all(self) -> (ResponseMeta, io::Result<Vec<u8>>) {
        let RawResponse { mut meta, mut body } = self;
        let mut bytes = Vec::new();
        let read = body.read_to_end(&mut bytes);
        drop(body);
        match read {
            Ok(len) => {
                meta.content_length = Some(len as u64);
                (meta, Ok(bytes))
            }
            Err(err) => (meta, Err(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_fields_join_multiple_values() {
        let headers: Values = [
            ("content-type", "text/plain"),
            ("content-type", "charset=utf-8"),
            ("content-encoding", "gzip"),
            ("content-length", "12"),
        ]
        .into_iter()
        .collect();
        let meta = ResponseMeta::from_parts(200, headers);
        assert_eq!(meta.content_type, "text/plain;charset=utf-8");
        assert_eq!(meta.content_encoding, "gzip");
        assert_eq!(meta.content_length, Some(12));
    }

    #[test]
    fn missing_headers_leave_fields_empty() {
        let meta = ResponseMeta::from_parts(204, Values::new());
        assert_eq!(meta.content_type, "");
        assert_eq!(meta.content_length, None);
        assert!(!meta.is_ok());
    }

    #[test]
    fn with_header_lowercases_and_rederives() {
        let meta = ResponseMeta::new(200).with_header("Content-Type", "application/json");
        assert_eq!(meta.content_type, "application/json");
        assert_eq!(meta.headers.get("content-type"), Some("application/json"));
    }

    #[test]
    fn read_all_corrects_declared_length() {
        let meta = ResponseMeta::new(200).with_header("content-length", "999");
        let raw = RawResponse {
            meta,
            body: ResponseBody::Mocked(Cursor::new(b"hello".to_vec())),
        };
        let (meta, bytes) = raw.read_all();
        assert_eq!(bytes.unwrap(), b"hello");
        assert_eq!(meta.content_length, Some(5));
    }

    #[test]
    fn from_header_map_keeps_every_value() {
        let mut map = HeaderMap::new();
        map.append("set-cookie", "a=1".parse().unwrap());
        map.append("set-cookie", "b=2".parse().unwrap());
        let meta = ResponseMeta::from_header_map(200, &map);
        assert_eq!(meta.headers.get_all("set-cookie").len(), 2);
    }
}
