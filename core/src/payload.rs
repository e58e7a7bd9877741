//! # Payload normalization
//!
//! Every payload carried by an [`Outcome`](crate::outcome::Outcome) is an object.
//! Primitive payloads are wrapped into a single-field object:
//!
//! | payload | object form | wire form |
//! |---|---|---|
//! | object (struct, JSON map) | unchanged | unchanged |
//! | `()` / `null` | [`VoidResponse`] | `{}` |
//! | `bool` | [`BooleanWrapper`] | `{"isTrue": b}` |
//! | numbers | [`NumberWrapper`] | `{"value": n}` |
//! | text | [`StringWrapper`] | `{"string": s}` |
//! | sequences (`Vec`, JSON array) | unchanged | unchanged |
//!
//! Wrapping is one-directional: the bare value is read back through the named field.
//! Dynamically typed [`serde_json::Value`] payloads are switched over at runtime and
//! always have an object form. Any other type has none: it does not implement
//! [`AsObject`], and building an outcome from it is rejected at compile time.
//!
//! ```compile_fail
//! use courier_core::Outcome;
//!
//! let _ = Outcome::<std::time::Duration>::success(std::time::Duration::from_secs(1));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const BOOLEAN_FIELD: &str = "isTrue";
pub const NUMBER_FIELD: &str = "value";
pub const STRING_FIELD: &str = "string";

/// JSON object form used for dynamically typed payloads.
pub type JsonObject = Map<String, Value>;

/// Conversion of a payload into its object form.
pub trait AsObject {
    type Object;

    fn into_object(self) -> Self::Object;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanWrapper {
    pub is_true: bool,
}

impl BooleanWrapper {
    pub fn into_inner(self) -> bool {
        self.is_true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct NumberWrapper<N = f64> {
    pub value: N,
}

impl<N> NumberWrapper<N> {
    pub fn into_inner(self) -> N {
        self.value
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StringWrapper {
    pub string: String,
}

impl StringWrapper {
    pub fn into_inner(self) -> String {
        self.string
    }

    pub fn as_str(&self) -> &str {
        &self.string
    }
}

/// Object form of an absent payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoidResponse {}

/// Declares types whose values already are objects, so their object form is themselves.
///
/// ```rust
/// use courier_core::object_payload;
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct User {
///     name: String,
/// }
///
/// object_payload!(User);
/// ```
#[macro_export]
macro_rules! object_payload {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::payload::AsObject for $ty {
                type Object = $ty;

                fn into_object(self) -> Self::Object {
                    self
                }
            }
        )+
    };
}

object_payload!(BooleanWrapper, StringWrapper, VoidResponse, JsonObject);

impl<N> AsObject for NumberWrapper<N> {
    type Object = Self;

    fn into_object(self) -> Self::Object {
        self
    }
}

impl AsObject for () {
    type Object = VoidResponse;

    fn into_object(self) -> Self::Object {
        VoidResponse {}
    }
}

impl AsObject for bool {
    type Object = BooleanWrapper;

    fn into_object(self) -> Self::Object {
        BooleanWrapper { is_true: self }
    }
}

macro_rules! number_payload {
    ($($ty:ty),+) => {
        $(
            impl AsObject for $ty {
                type Object = NumberWrapper<$ty>;

                fn into_object(self) -> Self::Object {
                    NumberWrapper { value: self }
                }
            }
        )+
    };
}

number_payload!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);

impl AsObject for String {
    type Object = StringWrapper;

    fn into_object(self) -> Self::Object {
        StringWrapper { string: self }
    }
}

impl AsObject for &str {
    type Object = StringWrapper;

    fn into_object(self) -> Self::Object {
        StringWrapper {
            string: self.to_owned(),
        }
    }
}

impl AsObject for char {
    type Object = StringWrapper;

    fn into_object(self) -> Self::Object {
        StringWrapper {
            string: self.to_string(),
        }
    }
}

impl<T> AsObject for Vec<T> {
    type Object = Vec<T>;

    fn into_object(self) -> Vec<T> {
        self
    }
}

/// Objects and arrays pass through; `null` becomes `{}`; primitives are wrapped.
impl AsObject for Value {
    type Object = Value;

    fn into_object(self) -> Value {
        match self {
            Value::Null => Value::Object(JsonObject::new()),
            Value::Bool(b) => single_field(BOOLEAN_FIELD, Value::Bool(b)),
            Value::Number(n) => single_field(NUMBER_FIELD, Value::Number(n)),
            Value::String(s) => single_field(STRING_FIELD, Value::String(s)),
            shaped @ (Value::Object(_) | Value::Array(_)) => shaped,
        }
    }
}

fn single_field(name: &str, value: Value) -> Value {
    let mut map = JsonObject::with_capacity(1);
    map.insert(name.to_string(), value);
    Value::Object(map)
}
