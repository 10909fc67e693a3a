//! Integration tests for the itinerary pipeline
//!
//! These drive the real group chat and pipeline over a scripted LLM client.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use tripplanner::agents::Roster;
use tripplanner::chat::{GroupChat, GroupChatManager};
use tripplanner::config::{ModelConfig, PlannerConfig, ProviderTag};
use tripplanner::domain::{Activity, Transport, TripRequest};
use tripplanner::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError};
use tripplanner::pipeline::{ItineraryPipeline, ItineraryResult};
use tripplanner::prompts::PromptLoader;

/// Replays canned results, then keeps failing with the fallback
struct ScriptedLlm {
    script: Mutex<VecDeque<Result<CompletionResponse, LlmError>>>,
    rate_limit_forever: bool,
    calls: AtomicUsize,
}

impl ScriptedLlm {
    fn new(script: Vec<Result<CompletionResponse, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            rate_limit_forever: false,
            calls: AtomicUsize::new(0),
        })
    }

    fn rate_limited() -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(VecDeque::new()),
            rate_limit_forever: true,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return next;
        }
        if self.rate_limit_forever {
            Err(LlmError::RateLimited {
                retry_after: Duration::from_secs(60),
            })
        } else {
            Err(LlmError::InvalidResponse("script exhausted".to_string()))
        }
    }
}

fn model() -> ModelConfig {
    ModelConfig {
        model_id: "deepseek-r1-distill-llama-70b".to_string(),
        credential: "gsk_test".to_string(),
        provider: ProviderTag::Groq,
        max_output_tokens: 5000,
    }
}

fn pipeline(llm: Arc<ScriptedLlm>, max_round: usize) -> ItineraryPipeline {
    let prompts = Arc::new(PromptLoader::embedded_only());
    let chat = GroupChat::new(Roster::travel(model()), max_round);
    let session = Arc::new(GroupChatManager::new(chat, llm, prompts.clone()));
    ItineraryPipeline::from_config(session, prompts, &PlannerConfig::default())
}

fn goa_trip() -> TripRequest {
    TripRequest::new("Pune", "Goa", "10-15 March 2025")
        .with_budget(5000)
        .with_activities([Activity::Food])
        .with_transport(Transport::Bus)
}

#[tokio::test]
async fn test_group_chat_summary_becomes_itinerary() {
    let llm = ScriptedLlm::new(vec![
        Ok(CompletionResponse::text("Overnight bus from Pune, about 1200 INR")),
        Ok(CompletionResponse::text("Guesthouse in Anjuna")),
        Ok(CompletionResponse::text("Day 1: arrive and eat fish thali")),
    ]);
    let pipeline = pipeline(llm.clone(), 4);

    let result = pipeline.request_itinerary(goa_trip()).await.unwrap();
    assert_eq!(
        result,
        ItineraryResult::Ready("Day 1: arrive and eat fish thali".to_string())
    );
    assert_eq!(llm.calls(), 3);

    // Repeat is served from the cache without touching the model
    let again = pipeline.request_itinerary(goa_trip()).await.unwrap();
    assert_eq!(again, result);
    assert_eq!(llm.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_provider_rate_limit_exhausts_retries() {
    let llm = ScriptedLlm::rate_limited();
    let pipeline = pipeline(llm.clone(), 6);

    let start = Instant::now();
    let result = pipeline.request_itinerary(goa_trip()).await.unwrap();

    assert_eq!(result, ItineraryResult::Unavailable);
    // Each conversation dies on its first agent turn
    assert_eq!(llm.calls(), 5);
    assert_eq!(start.elapsed().as_secs(), 31);
}

#[tokio::test(start_paused = true)]
async fn test_mid_chat_rate_limit_restarts_conversation() {
    let llm = ScriptedLlm::new(vec![
        Ok(CompletionResponse::text("Fly")),
        Err(LlmError::RateLimited {
            retry_after: Duration::from_secs(5),
        }),
        Ok(CompletionResponse::text("Fly")),
        Ok(CompletionResponse::text("Hotel")),
        Ok(CompletionResponse::text("Day 1: beach")),
    ]);
    let pipeline = pipeline(llm.clone(), 4);

    let start = Instant::now();
    let result = pipeline.request_itinerary(goa_trip()).await.unwrap();

    assert_eq!(result.summary(), Some("Day 1: beach"));
    assert_eq!(llm.calls(), 5);
    assert_eq!(start.elapsed().as_secs(), 1);
}

#[tokio::test]
async fn test_provider_error_is_not_retried() {
    let llm = ScriptedLlm::new(vec![Err(LlmError::ApiError {
        status: 401,
        message: "invalid api key".to_string(),
    })]);
    let pipeline = pipeline(llm.clone(), 6);

    let result = pipeline.request_itinerary(goa_trip()).await.unwrap();
    assert_eq!(result, ItineraryResult::Unavailable);
    assert_eq!(llm.calls(), 1);
}
