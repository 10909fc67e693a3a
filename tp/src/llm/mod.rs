//! LLM Client module
//!
//! Provides the provider-agnostic client trait and the OpenAI-compatible
//! implementation used for both Groq and OpenAI.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod openai;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use openai::OpenAIClient;
pub use types::{CompletionRequest, CompletionResponse, Message, Role, StopReason, TokenUsage};

use crate::config::{LlmConfig, ModelConfig};

/// Create an LLM client for the configured provider
pub fn create_client(llm: &LlmConfig, model: &ModelConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %model.provider, model = %model.model_id, "create_client: called");
    // Both providers speak the chat completions API; only the base URL differs
    Ok(Arc::new(OpenAIClient::from_config(llm, model)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ProviderTag};

    #[test]
    fn test_create_client_for_each_provider() {
        for provider in [ProviderTag::Groq, ProviderTag::OpenAi] {
            let mut config = Config::default();
            config.llm.provider = provider;
            let model = config.model_config(Some("key")).unwrap();
            assert!(create_client(&config.llm, &model).is_ok());
        }
    }
}
