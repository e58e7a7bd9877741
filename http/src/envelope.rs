use serde::Serialize;

/// The request document sent for every call: `{"body": <payload or {}>, "endpoint": "<id>"}`.
///
/// The endpoint is a routing key interpreted by the server; the URL never changes.
#[derive(Debug, Serialize)]
pub struct Envelope<'a, B> {
    pub body: EnvelopeBody<'a, B>,
    pub endpoint: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum EnvelopeBody<'a, B> {
    Payload(&'a B),
    Empty(EmptyObject),
}

/// Serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct EmptyObject {}

impl<'a, B> Envelope<'a, B> {
    pub fn new(endpoint: &'a str, body: Option<&'a B>) -> Self {
        let body = match body {
            Some(payload) => EnvelopeBody::Payload(payload),
            None => EnvelopeBody::Empty(EmptyObject {}),
        };
        Self { body, endpoint }
    }
}
