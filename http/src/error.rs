use courier_core::ParseError;
use std::path::PathBuf;
use thiserror::Error;

/// A call that cannot be expressed as an [`Outcome`](courier_core::Outcome).
///
/// Transport, status and application failures are all recovered into the outcome;
/// only broken contracts end up here.
#[derive(Error, Debug)]
pub enum ExecuteError {
    #[error("failed to encode request envelope for `{endpoint}`: {source}")]
    Encode {
        endpoint: String,
        #[source]
        source: ParseError,
    },

    /// The server signaled success but the body does not parse as the success type.
    #[error("`{endpoint}` answered {status} with a body that does not parse: {source}")]
    ContractViolation {
        endpoint: String,
        status: u16,
        body: String,
        #[source]
        source: ParseError,
    },
}

impl ExecuteError {
    pub fn endpoint(&self) -> &str {
        match self {
            ExecuteError::Encode { endpoint, .. }
            | ExecuteError::ContractViolation { endpoint, .. } => endpoint,
        }
    }

    pub fn is_parse_failure(&self) -> bool {
        matches!(self, ExecuteError::ContractViolation { .. })
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid server url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid value `{value}` for {key}")]
    InvalidEnv { key: &'static str, value: String },

    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}
