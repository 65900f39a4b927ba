use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// TCP endpoint the daemon listens on.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ListenEndpoint {
    /// Host interface to bind.
    pub host: String,
    /// TCP port to bind.
    pub port: u16,
}

impl ListenEndpoint {
    /// Builds an endpoint from its parts.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for ListenEndpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.host, self.port)
    }
}

impl FromStr for ListenEndpoint {
    type Err = EndpointParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let Some((host, port)) = input.rsplit_once(':') else {
            return Err(EndpointParseError::MissingPort(input.to_owned()));
        };
        if host.is_empty() {
            return Err(EndpointParseError::MissingHost(input.to_owned()));
        }
        let port = port
            .parse()
            .map_err(|source| EndpointParseError::InvalidPort {
                input: input.to_owned(),
                source,
            })?;
        Ok(Self::new(host, port))
    }
}

/// Errors encountered while parsing a [`ListenEndpoint`] from text.
#[derive(Debug, Error)]
pub enum EndpointParseError {
    /// No `:port` suffix was present.
    #[error("missing port in '{0}': expected host:port")]
    MissingPort(String),
    /// The host part was empty.
    #[error("missing host in '{0}': expected host:port")]
    MissingHost(String),
    /// The port part was not a valid 16-bit number.
    #[error("invalid port in '{input}': {source}")]
    InvalidPort {
        input: String,
        #[source]
        source: std::num::ParseIntError,
    },
}
