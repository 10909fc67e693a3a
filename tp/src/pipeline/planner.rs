//! Request orchestration: validate, render, cache, retry, offload

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, error, info, warn};

use super::cache::ItineraryCache;
use super::retry::RetryPolicy;
use super::{ItineraryResult, PipelineError};
use crate::chat::ConversationSession;
use crate::config::PlannerConfig;
use crate::domain::TripRequest;
use crate::prompts::PromptLoader;

/// Turns trip requests into itineraries
///
/// Cloning is cheap; clones share the cache and the worker permit.
#[derive(Clone)]
pub struct ItineraryPipeline {
    prompts: Arc<PromptLoader>,
    worker: Worker,
}

/// State handed to each spawned request task
#[derive(Clone)]
struct Worker {
    session: Arc<dyn ConversationSession>,
    cache: Arc<ItineraryCache>,
    retry: RetryPolicy,
    timeout: Option<Duration>,
    permits: Arc<Semaphore>,
}

impl ItineraryPipeline {
    /// Pipeline with default policy: 10 cached prompts, 5 attempts, 1s backoff
    pub fn new(session: Arc<dyn ConversationSession>, prompts: Arc<PromptLoader>) -> Self {
        Self::from_config(session, prompts, &PlannerConfig::default())
    }

    pub fn from_config(
        session: Arc<dyn ConversationSession>,
        prompts: Arc<PromptLoader>,
        config: &PlannerConfig,
    ) -> Self {
        debug!(?config, "ItineraryPipeline::from_config: called");
        Self {
            prompts,
            worker: Worker {
                session,
                cache: Arc::new(ItineraryCache::new(config.cache_capacity)),
                retry: RetryPolicy::from_config(config),
                timeout: config.timeout_secs.map(Duration::from_secs),
                // One conversation at a time
                permits: Arc::new(Semaphore::new(1)),
            },
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.worker.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.worker.timeout = timeout;
        self
    }

    pub fn with_cache(mut self, cache: Arc<ItineraryCache>) -> Self {
        self.worker.cache = cache;
        self
    }

    pub fn cache(&self) -> &ItineraryCache {
        &self.worker.cache
    }

    /// Validate a request and render its task prompt without running it
    pub fn render_prompt(&self, trip: &TripRequest) -> Result<String, PipelineError> {
        trip.validate()?;
        self.prompts
            .trip_prompt(trip)
            .map_err(|e| PipelineError::Prompt(e.to_string()))
    }

    /// Start a request on a worker task
    ///
    /// Validation and rendering happen before anything is spawned, so a bad
    /// request never reaches the session.
    pub fn submit(&self, trip: TripRequest) -> Result<RequestHandle, PipelineError> {
        debug!(departure = %trip.departure, destination = %trip.destination, "submit: called");
        let prompt = self.render_prompt(&trip)?;

        let worker = self.worker.clone();
        let task_prompt = prompt.clone();
        let task = tokio::spawn(async move { worker.run(task_prompt).await });

        Ok(RequestHandle { prompt, task })
    }

    /// Submit a request and wait for its result
    pub async fn request_itinerary(&self, trip: TripRequest) -> Result<ItineraryResult, PipelineError> {
        self.submit(trip)?.wait().await
    }
}

impl Worker {
    async fn run(self, prompt: String) -> ItineraryResult {
        if let Some(hit) = self.cache.get(&prompt) {
            debug!("run: cache hit");
            return hit;
        }

        let Ok(_permit) = self.permits.acquire().await else {
            error!("Worker pool closed");
            return ItineraryResult::Unavailable;
        };

        // An identical request may have finished while we waited
        if let Some(hit) = self.cache.get(&prompt) {
            debug!("run: cache hit after wait");
            return hit;
        }

        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, self.invoke(&prompt)).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(?limit, "Itinerary request timed out");
                    return ItineraryResult::Unavailable;
                }
            },
            None => self.invoke(&prompt).await,
        };

        self.cache.insert(prompt, result.clone());
        result
    }

    /// Run the session, backing off on rate limits
    async fn invoke(&self, prompt: &str) -> ItineraryResult {
        for attempt in 0..self.retry.max_attempts {
            debug!(attempt, "invoke: starting session");
            match self.session.initiate(prompt).await {
                Ok(result) if !result.summary.trim().is_empty() => {
                    info!(id = %result.id, attempts = attempt + 1, "Itinerary ready");
                    return ItineraryResult::Ready(result.summary);
                }
                Ok(result) => {
                    error!(id = %result.id, "Session returned an empty summary");
                    return ItineraryResult::Unavailable;
                }
                Err(e) if e.is_rate_limit() => {
                    let delay = self.retry.delay(attempt, e.retry_after());
                    warn!(
                        attempt = attempt + 1,
                        max_attempts = self.retry.max_attempts,
                        ?delay,
                        "Rate limited, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    error!(error = %e, "Itinerary generation failed");
                    return ItineraryResult::Unavailable;
                }
            }
        }

        error!(max_attempts = self.retry.max_attempts, "Rate limit retries exhausted");
        ItineraryResult::Unavailable
    }
}

/// A submitted request running on a worker task
pub struct RequestHandle {
    prompt: String,
    task: JoinHandle<ItineraryResult>,
}

impl RequestHandle {
    /// The rendered prompt this request is running
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Abort the request; `wait` then reports [`PipelineError::Cancelled`]
    pub fn cancel(&self) {
        debug!("RequestHandle::cancel: called");
        self.task.abort();
    }

    /// Detached canceller, usable after `wait` has taken the handle
    pub fn abort_handle(&self) -> AbortHandle {
        self.task.abort_handle()
    }

    pub async fn wait(self) -> Result<ItineraryResult, PipelineError> {
        match self.task.await {
            Ok(result) => Ok(result),
            Err(e) if e.is_cancelled() => Err(PipelineError::Cancelled),
            Err(e) => Err(PipelineError::Worker(e.to_string())),
        }
    }
}
