use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Failure of a [`Serializer`](crate::serializer::Serializer) to read or write a document.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{message}")]
    Custom {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl ParseError {
    /// Error for serializers that are not backed by serde_json.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Custom {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    /// Connection refused, DNS lookup failed, TLS handshake failed.
    Connect,
    /// No response arrived in time.
    Timeout,
    /// The request could not be built or sent.
    Request,
    /// The response body could not be read to the end.
    Body,
    Other,
}

impl TransportErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Request => "request",
            TransportErrorKind::Body => "body",
            TransportErrorKind::Other => "other",
        }
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The network round trip itself could not complete.
///
/// Carries the underlying client error (if any) as its source so callers can
/// still downcast to the concrete transport error.
#[derive(Error, Debug)]
#[error("{kind} failure: {message}")]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(kind: TransportErrorKind, source: impl Into<BoxError>) -> Self {
        let source = source.into();
        Self {
            kind,
            message: source.to_string(),
            source: Some(source),
        }
    }

    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_connect(&self) -> bool {
        self.kind == TransportErrorKind::Connect
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == TransportErrorKind::Timeout
    }
}
