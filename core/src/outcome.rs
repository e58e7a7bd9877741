use crate::error::TransportError;
use crate::payload::AsObject;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// The explicit result of one RPC call.
///
/// `Outcome` represents "Failure as Data".
/// Every expected way a call can end (typed success, typed application error,
/// transport failure, failure status with a body of unknown shape) is one variant.
/// Exactly one variant is populated, so exactly one of [`is_ok`](Outcome::is_ok),
/// [`is_fetch_err`](Outcome::is_fetch_err), [`is_status_error`](Outcome::is_status_error)
/// and [`is_custom_error`](Outcome::is_custom_error) holds.
///
/// `S` and `E` may be any [`AsObject`] type; payloads are stored in their object form.
/// `E` defaults to a dynamic [`Value`], so any well-formed failure document is a
/// [`CustomError`](Outcome::CustomError).
pub enum Outcome<S: AsObject, E: AsObject = Value> {
    /// Transport succeeded and the status denotes success.
    Success(S::Object),

    /// Failure status with a body matching the application error shape.
    CustomError(E::Object),

    /// The round trip never produced a response.
    FetchError(FetchError),

    /// Failure status with a body that did not parse as `E`.
    StatusError(StatusError),
}

/// Discriminant of an [`Outcome`], convenient for logging and matching without payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Success,
    CustomError,
    FetchError,
    StatusError,
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::Success => "success",
            OutcomeKind::CustomError => "custom_error",
            OutcomeKind::FetchError => "fetch_error",
            OutcomeKind::StatusError => "status_error",
        }
    }

    pub fn is_generic_error(&self) -> bool {
        matches!(self, OutcomeKind::FetchError | OutcomeKind::StatusError)
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone)]
#[error("request could not be completed: {error}")]
pub struct FetchError {
    #[source]
    error: Arc<TransportError>,
}

impl FetchError {
    pub fn new(error: TransportError) -> Self {
        Self {
            error: Arc::new(error),
        }
    }

    pub fn error(&self) -> &TransportError {
        &self.error
    }
}

/// Raw response text and status code of a failure response whose body had no known shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("server answered with status {code} and an unrecognized body")]
pub struct StatusError {
    pub error: String,
    pub code: u16,
}

/// A failure that is not an application-defined typed error.
#[derive(Error, Debug, Clone)]
pub enum GenericError {
    #[error(transparent)]
    Fetch(FetchError),
    #[error(transparent)]
    Status(StatusError),
}

/// The failure side of [`Outcome::into_result`].
pub enum Failure<E: AsObject = Value> {
    Custom(E::Object),
    Generic(GenericError),
}

impl<E: AsObject> Failure<E> {
    pub fn is_generic(&self) -> bool {
        matches!(self, Failure::Generic(_))
    }
}

impl<S: AsObject, E: AsObject> Outcome<S, E> {
    pub fn success(payload: S) -> Self {
        Outcome::Success(payload.into_object())
    }

    pub fn custom_error(payload: E) -> Self {
        Outcome::CustomError(payload.into_object())
    }

    pub fn fetch_error(error: TransportError) -> Self {
        Outcome::FetchError(FetchError::new(error))
    }

    pub fn status_error(error: impl Into<String>, code: u16) -> Self {
        Outcome::StatusError(StatusError {
            error: error.into(),
            code,
        })
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Success(_) => OutcomeKind::Success,
            Outcome::CustomError(_) => OutcomeKind::CustomError,
            Outcome::FetchError(_) => OutcomeKind::FetchError,
            Outcome::StatusError(_) => OutcomeKind::StatusError,
        }
    }

    /// No error occurred; the success payload is available.
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// The round trip itself failed; neither client nor server produced a response.
    pub fn is_fetch_err(&self) -> bool {
        matches!(self, Outcome::FetchError(_))
    }

    /// Failure status caused by some generic problem (bad gateway, HTML error page, ...).
    pub fn is_status_error(&self) -> bool {
        matches!(self, Outcome::StatusError(_))
    }

    /// Failure status returned explicitly by server code, with a typed payload.
    pub fn is_custom_error(&self) -> bool {
        matches!(self, Outcome::CustomError(_))
    }

    pub fn is_generic_error(&self) -> bool {
        self.is_fetch_err() || self.is_status_error()
    }

    pub fn as_success(&self) -> Option<&S::Object> {
        match self {
            Outcome::Success(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn as_custom_error(&self) -> Option<&E::Object> {
        match self {
            Outcome::CustomError(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn as_fetch_error(&self) -> Option<&FetchError> {
        match self {
            Outcome::FetchError(err) => Some(err),
            _ => None,
        }
    }

    pub fn as_status_error(&self) -> Option<&StatusError> {
        match self {
            Outcome::StatusError(err) => Some(err),
            _ => None,
        }
    }

    pub fn into_success(self) -> Option<S::Object> {
        match self {
            Outcome::Success(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn into_generic_error(self) -> Option<GenericError> {
        match self {
            Outcome::FetchError(err) => Some(GenericError::Fetch(err)),
            Outcome::StatusError(err) => Some(GenericError::Status(err)),
            _ => None,
        }
    }

    /// Collapse into a std `Result`, for callers that only branch on success.
    pub fn into_result(self) -> Result<S::Object, Failure<E>> {
        match self {
            Outcome::Success(payload) => Ok(payload),
            Outcome::CustomError(payload) => Err(Failure::Custom(payload)),
            Outcome::FetchError(err) => Err(Failure::Generic(GenericError::Fetch(err))),
            Outcome::StatusError(err) => Err(Failure::Generic(GenericError::Status(err))),
        }
    }
}

/// True when the outcome is a transport failure or a status failure with an unrecognized body.
pub fn is_generic_error<S: AsObject, E: AsObject>(outcome: &Outcome<S, E>) -> bool {
    outcome.is_generic_error()
}

impl<S, E> fmt::Debug for Outcome<S, E>
where
    S: AsObject,
    E: AsObject,
    S::Object: fmt::Debug,
    E::Object: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success(payload) => f.debug_tuple("Success").field(payload).finish(),
            Outcome::CustomError(payload) => f.debug_tuple("CustomError").field(payload).finish(),
            Outcome::FetchError(err) => f.debug_tuple("FetchError").field(err).finish(),
            Outcome::StatusError(err) => f.debug_tuple("StatusError").field(err).finish(),
        }
    }
}

impl<S, E> Clone for Outcome<S, E>
where
    S: AsObject,
    E: AsObject,
    S::Object: Clone,
    E::Object: Clone,
{
    fn clone(&self) -> Self {
        match self {
            Outcome::Success(payload) => Outcome::Success(payload.clone()),
            Outcome::CustomError(payload) => Outcome::CustomError(payload.clone()),
            Outcome::FetchError(err) => Outcome::FetchError(err.clone()),
            Outcome::StatusError(err) => Outcome::StatusError(err.clone()),
        }
    }
}

impl<E> fmt::Debug for Failure<E>
where
    E: AsObject,
    E::Object: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Custom(payload) => f.debug_tuple("Custom").field(payload).finish(),
            Failure::Generic(err) => f.debug_tuple("Generic").field(err).finish(),
        }
    }
}
