//! TripPlanner - Multi-Agent Travel Itinerary Generator
//!
//! A trip request is validated, rendered into a task prompt, and handed to a
//! small group chat of LLM-backed agents (transport, stay, lead) that argue
//! it out for a bounded number of rounds. The lead's final message is the
//! itinerary.
//!
//! # Core Concepts
//!
//! - **Validate Early**: Bad requests never reach the model
//! - **Prompt as Key**: Identical requests render identical prompts and hit the cache
//! - **Back Off on Quota**: Rate limits retry with exponential delays, everything else fails fast
//! - **One at a Time**: A single worker permit serializes conversations
//!
//! # Modules
//!
//! - [`domain`] - Trip request types and validation
//! - [`prompts`] - Handlebars prompt templates
//! - [`llm`] - LLM client trait and OpenAI-compatible implementation
//! - [`agents`] - Agent roster
//! - [`chat`] - Group chat session
//! - [`pipeline`] - Cached, retried, worker-offloaded itinerary requests
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod agents;
pub mod chat;
pub mod cli;
pub mod config;
pub mod domain;
pub mod form;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod prompts;

// Re-export commonly used types
pub use agents::{Agent, AgentKind, Roster};
pub use chat::{ChatResult, ConversationSession, GroupChat, GroupChatManager, SessionError};
pub use config::{Config, ConfigError, LlmConfig, ModelConfig, PlannerConfig, ProviderTag};
pub use domain::{Accommodation, Activity, Transport, TripRequest, ValidationError};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenAIClient, create_client};
pub use pipeline::{ItineraryCache, ItineraryPipeline, ItineraryResult, PipelineError, RequestHandle, RetryPolicy};
pub use prompts::PromptLoader;
