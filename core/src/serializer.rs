use crate::error::ParseError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Converts between the textual wire format and typed values.
///
/// `parse` must fail with a [`ParseError`] on malformed input and be total over
/// well-formed input of the expected shape. `stringify` is used for the request
/// envelope, so both directions share one format.
pub trait Serializer: Send + Sync + 'static {
    fn parse<T: DeserializeOwned>(&self, text: &str) -> Result<T, ParseError>;

    fn stringify<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, ParseError>;
}

/// The default wire format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn parse<T: DeserializeOwned>(&self, text: &str) -> Result<T, ParseError> {
        Ok(serde_json::from_str(text)?)
    }

    fn stringify<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, ParseError> {
        Ok(serde_json::to_string(value)?)
    }
}

impl<Z: Serializer> Serializer for Arc<Z> {
    fn parse<T: DeserializeOwned>(&self, text: &str) -> Result<T, ParseError> {
        (**self).parse(text)
    }

    fn stringify<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, ParseError> {
        (**self).stringify(value)
    }
}
