//! Conversation session boundary consumed by the request pipeline

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::llm::{LlmError, TokenUsage};

/// Errors surfaced by a conversation session
#[derive(Debug, Error)]
pub enum SessionError {
    /// The provider refused the call for quota reasons
    #[error("Rate limited by provider, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("Agent '{agent}' failed: {source}")]
    Agent {
        agent: String,
        #[source]
        source: LlmError,
    },

    #[error("Conversation ended without a summary")]
    EmptySummary,

    #[error("Prompt error: {0}")]
    Prompt(String),
}

impl SessionError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, SessionError::RateLimited { .. })
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            SessionError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// Attribute an LLM failure to the agent that was speaking
    pub fn from_agent(agent: &str, err: LlmError) -> Self {
        if let Some(retry_after) = err.retry_after() {
            return SessionError::RateLimited {
                retry_after: Some(retry_after),
            };
        }
        SessionError::Agent {
            agent: agent.to_string(),
            source: err,
        }
    }
}

/// One message posted to the group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub speaker: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(speaker: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Outcome of one completed conversation
#[derive(Debug, Clone)]
pub struct ChatResult {
    pub id: Uuid,
    /// Final aggregated answer; the only field the pipeline reads
    pub summary: String,
    pub history: Vec<ChatMessage>,
    pub usage: TokenUsage,
    /// The summary hit the token limit and may end mid-sentence
    pub truncated: bool,
}

impl ChatResult {
    /// A result with only a summary, for sessions that keep no transcript
    pub fn from_summary(summary: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            summary: summary.into(),
            history: Vec::new(),
            usage: TokenUsage::default(),
            truncated: false,
        }
    }
}

/// A multi-party conversation that turns a task prompt into a summary
#[async_trait]
pub trait ConversationSession: Send + Sync {
    async fn initiate(&self, prompt: &str) -> Result<ChatResult, SessionError>;
}
