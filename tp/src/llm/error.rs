//! Provider call failures

use std::time::Duration;
use thiserror::Error;

/// What can go wrong talking to the chat completions endpoint
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP 429; the wait comes from `retry-after` or a fixed fallback
    #[error("Provider quota exceeded (retry after {}s)", retry_after.as_secs_f64())]
    RateLimited { retry_after: Duration },

    /// Any other non-2xx status, with the body as the provider sent it
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// Provider-suggested wait, present only for quota refusals
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            LlmError::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}
