use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    #[error("Method not allowed")]
    Method,

    #[error("Upstream returned {status}: {message}")]
    Upstream {
        status: u16,
        message: String,
        body: String,
    },

    #[error("Upstream request timed out after {0} ms")]
    Timeout(u64),

    #[error("Failed to send HTTP request: {0}")]
    Http(String),

    #[error("Failed to parse upstream response: {0}")]
    Parse(String),

    #[error("Auxiliary lookup failed: {0}")]
    Auxiliary(String),

    #[error("no text in outputs")]
    NoReply { raw: Value },
}

impl HandlerError {
    /// Error for a credential that the endpoint cannot run without.
    #[must_use]
    pub fn missing_credential(name: &str) -> Self {
        HandlerError::Config(format!("Server Error: {name} is missing."))
    }

    /// HTTP status the error is surfaced with.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::Validation(_) => 400,
            HandlerError::Method => 405,
            HandlerError::Upstream { status, .. } if (400..=599).contains(status) => *status,
            _ => 500,
        }
    }
}

impl From<reqwest::Error> for HandlerError {
    fn from(error: reqwest::Error) -> Self {
        HandlerError::Http(error.to_string())
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(error: serde_json::Error) -> Self {
        HandlerError::Parse(error.to_string())
    }
}
