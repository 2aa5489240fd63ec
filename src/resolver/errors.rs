// Error types for the resolver pipeline

use thiserror::Error;

use super::diagnostics::BlockingReason;

/// Client-side input problems. Resolution never starts when one of these occurs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// No `url` query parameter (or an empty one)
    #[error("Missing url parameter")]
    MissingUrl,

    /// URL does not match any known YouTube URL shape
    #[error("Missing or invalid YouTube URL: {0}")]
    InvalidUrl(String),
}

/// A failure inside one strategy. The orchestrator swallows these and moves on,
/// they only show up in logs.
#[derive(Debug, Error)]
pub enum StrategyFault {
    /// Transport level failure (DNS, TLS, connection reset, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// The HTTP client gave up waiting for the remote side
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Remote answered with a non-2xx status
    #[error("HTTP {status} from {endpoint}")]
    HttpStatus { status: u16, endpoint: String },

    /// Response body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Watch page says the video cannot be played
    #[error("Unplayable ({}): {message}", .reason.description())]
    Unplayable {
        reason: BlockingReason,
        message: String,
    },

    /// The strategy as a whole ran past its time budget
    #[error("Strategy exceeded {0}s deadline")]
    Deadline(u64),

    /// Every configured mirror failed
    #[error("All {0} mirror instances failed")]
    MirrorsExhausted(usize),
}

impl From<reqwest::Error> for StrategyFault {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return Self::Timeout(e.to_string());
        }

        if let Some(status) = e.status() {
            return Self::HttpStatus {
                status: status.as_u16(),
                endpoint: e
                    .url()
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
            };
        }

        if e.is_decode() {
            return Self::Parse(e.to_string());
        }

        Self::Network(e.to_string())
    }
}

impl From<serde_json::Error> for StrategyFault {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(format!("Invalid JSON: {}", e))
    }
}
