//! # courier-core
//!
//! Transport-agnostic result model of a single RPC call: the [`Outcome`] enum,
//! payload normalization ([`AsObject`]) and the [`Serializer`] collaborator.

pub mod error;
pub mod outcome;
pub mod payload;
pub mod serializer;

pub use error::{BoxError, ParseError, TransportError, TransportErrorKind};
pub use outcome::{
    Failure, FetchError, GenericError, Outcome, OutcomeKind, StatusError, is_generic_error,
};
pub use payload::{
    AsObject, BooleanWrapper, JsonObject, NumberWrapper, StringWrapper, VoidResponse,
};
pub use serializer::{JsonSerializer, Serializer};

pub mod prelude {
    pub use crate::error::{ParseError, TransportError, TransportErrorKind};
    pub use crate::object_payload;
    pub use crate::outcome::{Failure, GenericError, Outcome, OutcomeKind, is_generic_error};
    pub use crate::payload::{
        AsObject, BooleanWrapper, JsonObject, NumberWrapper, StringWrapper, VoidResponse,
    };
    pub use crate::serializer::{JsonSerializer, Serializer};
}
