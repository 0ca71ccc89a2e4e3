use crate::ephemeris::EphemerisError;
use std::time::Duration;
use thiserror::Error;

/// Failures of the network lookups (geocoding and timezone).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    #[error("no match for '{query}'")]
    NotFound { query: String },
    #[error("{service} did not answer within {timeout:?}")]
    Timeout {
        service: &'static str,
        timeout: Duration,
    },
    #[error("{service} request failed: {message}")]
    Transport {
        service: &'static str,
        message: String,
    },
    #[error("{service} returned HTTP {status}")]
    Upstream { service: &'static str, status: u16 },
    #[error("{service} returned an unreadable response: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },
}

impl LookupError {
    /// Whether repeating the same request later could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            LookupError::Timeout { .. } | LookupError::Transport { .. } => true,
            LookupError::Upstream { status, .. } => *status == 429 || *status >= 500,
            LookupError::NotFound { .. } | LookupError::Decode { .. } => false,
        }
    }

    pub(crate) fn from_reqwest(service: &'static str, timeout: Duration, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LookupError::Timeout { service, timeout }
        } else if let Some(status) = err.status() {
            LookupError::Upstream {
                service,
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            LookupError::Decode {
                service,
                message: err.to_string(),
            }
        } else {
            LookupError::Transport {
                service,
                message: err.to_string(),
            }
        }
    }
}

/// Everything that can stop a chart from being produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("invalid birth data: {0}")]
    Validation(String),
    #[error("failed to get coordinates for {place}: {source}")]
    Lookup {
        place: String,
        #[source]
        source: LookupError,
    },
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
}

impl ChartError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ChartError::Lookup { source, .. } => source.is_retryable(),
            _ => false,
        }
    }
}
