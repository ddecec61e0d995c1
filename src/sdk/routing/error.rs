use serde::Deserialize;
use thiserror::Error;

// Error body returned by OSRM alongside a non-2xx status
#[derive(Deserialize, Debug)]
pub struct OsrmErrorPayload {
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Error, Debug)]
pub enum RoutingError {
    #[error("Empty route geometry")]
    EmptyGeometry,

    #[error("HTTP {status}")]
    Http { status: u16 },

    #[error("HTTP {status} (max retries)")]
    RetriesExhausted { status: u16 },

    #[error("Underlying request failed: {0}")]
    Network(String),

    // Superseded by newer input; never shown to the user
    #[error("Request cancelled")]
    Cancelled,

    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("At least two distinct points are needed for a route, got {0}")]
    NotEnoughPoints(usize),
}

impl RoutingError {
    /// 429 and every 5xx are worth another attempt; other statuses are final.
    pub fn is_retriable_status(status: u16) -> bool {
        status == 429 || status >= 500
    }

    pub fn is_retriable(&self) -> bool {
        match self {
            RoutingError::Http { status } => Self::is_retriable_status(*status),
            RoutingError::Network(_) => true,
            _ => false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RoutingError::Cancelled)
    }
}

impl From<reqwest::Error> for RoutingError {
    fn from(err: reqwest::Error) -> Self {
        RoutingError::Network(err.to_string())
    }
}
