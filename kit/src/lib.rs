//! Courier facade crate.
//!
//! This crate re-exports the core result model and the HTTP executor with a single entry point.
//!
//! ```rust,ignore
//! use courier::prelude::*;
//!
//! let server = HttpServer::new("https://api.example.com/rpc");
//! let pong: Outcome<bool> = server.call("ping").await?;
//! if pong.is_ok() { /* ... */ }
//! ```

pub mod telemetry;

pub use courier_core as core;
#[cfg(feature = "http")]
pub use courier_http as http;

pub use courier_core::{Outcome, OutcomeKind, Serializer, is_generic_error, object_payload};
#[cfg(feature = "http")]
pub use courier_http::{ClientConfig, ExecuteError, HttpServer};

pub mod prelude {
    pub use courier_core::prelude::*;
    #[cfg(feature = "http")]
    pub use courier_http::prelude::*;
}
