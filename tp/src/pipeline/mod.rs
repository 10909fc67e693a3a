//! Itinerary request pipeline
//!
//! Validates a [`TripRequest`](crate::domain::TripRequest), renders the task
//! prompt, and runs the conversation session on a worker task with caching
//! and rate-limit backoff. Failures that are not the caller's fault collapse
//! into [`ItineraryResult::Unavailable`].

mod cache;
mod planner;
mod retry;

use thiserror::Error;

use crate::domain::ValidationError;

pub use cache::ItineraryCache;
pub use planner::{ItineraryPipeline, RequestHandle};
pub use retry::RetryPolicy;

/// Outcome of one itinerary request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItineraryResult {
    /// The session's final summary
    Ready(String),
    /// No itinerary could be produced
    Unavailable,
}

impl ItineraryResult {
    pub fn summary(&self) -> Option<&str> {
        match self {
            ItineraryResult::Ready(summary) => Some(summary),
            ItineraryResult::Unavailable => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ItineraryResult::Ready(_))
    }
}

/// Errors that stop a request before or outside the session
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to render prompt: {0}")]
    Prompt(String),

    #[error("Request was cancelled")]
    Cancelled,

    #[error("Worker failed: {0}")]
    Worker(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_accessors() {
        let ready = ItineraryResult::Ready("Day 1: ...".to_string());
        assert!(ready.is_ready());
        assert_eq!(ready.summary(), Some("Day 1: ..."));

        assert!(!ItineraryResult::Unavailable.is_ready());
        assert_eq!(ItineraryResult::Unavailable.summary(), None);
    }

    #[test]
    fn test_validation_error_is_transparent() {
        let err: PipelineError = ValidationError::MissingField("departure").into();
        assert_eq!(err.to_string(), ValidationError::MissingField("departure").to_string());
    }
}
