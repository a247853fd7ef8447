//! Pluggable body serialization.
//!
//! A serializer is any `FnOnce(&T) -> Result<Vec<u8>, CodecError>`; `to_json`
//! and `to_xml` are provided. A deserializer is anything implementing
//! `Deserializer`, which fills a destination the caller owns. Closures of the
//! shape `FnMut(&[u8]) -> Result<(), CodecError>` qualify, as do the `Json`,
//! `Xml` and `Raw` wrappers below.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CodecError, CodecFormat};
use crate::http::Values;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_XML: &str = "application/xml";
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// Consumes a response body into a destination owned by the caller.
pub trait Deserializer {
    fn deserialize(&mut self, body: &[u8]) -> Result<(), CodecError>;
}

impl<F> Deserializer for F
where
    F: FnMut(&[u8]) -> Result<(), CodecError>,
{
    fn deserialize(&mut self, body: &[u8]) -> Result<(), CodecError> {
        self(body)
    }
}

/// Decode a JSON body into the wrapped destination.
#[derive(Debug)]
pub struct Json<'a, T>(pub &'a mut T);

impl<T: DeserializeOwned> Deserializer for Json<'_, T> {
    fn deserialize(&mut self, body: &[u8]) -> Result<(), CodecError> {
        *self.0 = from_json(body)?;
        Ok(())
    }
}

/// Decode an XML body into the wrapped destination.
#[derive(Debug)]
pub struct Xml<'a, T>(pub &'a mut T);

impl<T: DeserializeOwned> Deserializer for Xml<'_, T> {
    fn deserialize(&mut self, body: &[u8]) -> Result<(), CodecError> {
        *self.0 = from_xml(body)?;
        Ok(())
    }
}

/// Copy the body bytes verbatim.
#[derive(Debug)]
pub struct Raw<'a>(pub &'a mut Vec<u8>);

impl Deserializer for Raw<'_> {
    fn deserialize(&mut self, body: &[u8]) -> Result<(), CodecError> {
        self.0.clear();
        self.0.extend_from_slice(body);
        Ok(())
    }
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec(value)?)
}

pub fn from_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, CodecError> {
    Ok(serde_json::from_slice(body)?)
}

/// Serialize to XML. The root element is named after the type.
pub fn to_xml<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    Ok(quick_xml::se::to_string(value)?.into_bytes())
}

pub fn from_xml<T: DeserializeOwned>(body: &[u8]) -> Result<T, CodecError> {
    let text = std::str::from_utf8(body).map_err(|e| CodecError::new(CodecFormat::Xml, e))?;
    Ok(quick_xml::de::from_str(text)?)
}

/// Flatten the top-level members of `value` into form fields.
///
/// String members are used verbatim; every other member is rendered as JSON
/// text. Anything other than a JSON object is rejected.
pub fn to_form_fields<T: Serialize + ?Sized>(value: &T) -> Result<Values, CodecError> {
    let serde_json::Value::Object(members) = serde_json::to_value(value)? else {
        return Err(CodecError::new(
            CodecFormat::Form,
            "post data can only be decomposed from an object",
        ));
    };
    let mut fields = Values::new();
    for (key, member) in members {
        let value = match member {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        };
        fields.add(key, value);
    }
    Ok(fields)
}
