//! Error taxonomy for path service requests
//!
//! The `Display` text of every variant is what ends up in the error banner, so the
//! formatting here is user facing.

use serde::Deserialize;

/// Banner text used when a request was sent but no response came back
pub const NO_RESPONSE_MESSAGE: &str =
    "No response from server. Please make sure the server is running.";

/// A failed request to the path service, in classification priority order
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestError {
    /// The response body carried an explicit error message
    #[error("{0}")]
    Service(String),

    /// A response arrived with a non-success status and no usable message
    #[error("Server error: {status}")]
    Http { status: u16 },

    /// The request went out but nothing came back
    #[error("{}", NO_RESPONSE_MESSAGE)]
    Transport(String),

    /// The request could not be built or its outcome could not be interpreted
    #[error("Error: {0}")]
    Client(String),
}

impl RequestError {
    /// Map a low-level HTTP client failure onto the taxonomy
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::Client(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }

    /// Underlying detail for logs (the banner text hides transport details)
    pub fn detail(&self) -> &str {
        match self {
            Self::Service(msg) | Self::Transport(msg) | Self::Client(msg) => msg,
            Self::Http { .. } => "",
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<serde_json::Value>,
}

/// Classify a non-success response.
///
/// A body of the form `{"error": "<non-empty string>"}` wins over the status code.
pub fn classify_failure(status: u16, body: &[u8]) -> RequestError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.error)
        .and_then(|error| match error {
            serde_json::Value::String(msg) if !msg.is_empty() => Some(msg),
            _ => None,
        });

    match message {
        Some(msg) => RequestError::Service(msg),
        None => RequestError::Http { status },
    }
}
