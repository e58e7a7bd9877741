//! # courier-http
//!
//! Request executor for servers that expose all endpoints behind a single URL.
//!
//! [`HttpServer`] posts `{"body": ..., "endpoint": ...}` and turns whatever comes back
//! into a [`courier_core::Outcome`]. The round trip itself goes through the
//! [`Transport`] trait; [`ReqwestTransport`] is the default.

pub mod config;
pub mod envelope;
pub mod error;
pub mod server;
pub mod transport;

pub use config::ClientConfig;
pub use envelope::{EmptyObject, Envelope, EnvelopeBody};
pub use error::{ConfigError, ExecuteError};
pub use server::HttpServer;
pub use transport::{RawResponse, ReqwestTransport, Transport};

pub mod prelude {
    pub use crate::config::ClientConfig;
    pub use crate::error::{ConfigError, ExecuteError};
    pub use crate::server::HttpServer;
    pub use crate::transport::{RawResponse, ReqwestTransport, Transport};
}
