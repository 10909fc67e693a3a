//! Group chat driven over an LLM client

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::session::{ChatMessage, ChatResult, ConversationSession, SessionError};
use crate::agents::{Agent, AgentKind, Roster};
use crate::llm::{CompletionRequest, LlmClient, Message, StopReason, TokenUsage};
use crate::prompts::{AgentPromptContext, PromptLoader};

/// Participants plus the round limit
///
/// A round is one posted message; the opening prompt is round 1.
#[derive(Debug, Clone)]
pub struct GroupChat {
    roster: Roster,
    max_round: usize,
}

impl GroupChat {
    pub fn new(roster: Roster, max_round: usize) -> Self {
        debug!(max_round, "GroupChat::new: called");
        Self { roster, max_round }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn max_round(&self) -> usize {
        self.max_round
    }

    /// Speaker order after the opening prompt
    ///
    /// Model-backed members take turns in roster order; the lead always
    /// closes the chat so the last message is the itinerary.
    pub fn speaker_order(&self) -> Vec<&Agent> {
        let speakers: Vec<&Agent> = self.roster.speakers().collect();
        let turns = self.max_round.saturating_sub(1);
        if speakers.is_empty() || turns == 0 {
            return Vec::new();
        }

        let lead = speakers.iter().copied().find(|a| a.kind == AgentKind::Lead);
        (0..turns)
            .map(|turn| match lead {
                Some(lead) if turn + 1 == turns => lead,
                _ => speakers[turn % speakers.len()],
            })
            .collect()
    }
}

/// Drives a [`GroupChat`] to completion
pub struct GroupChatManager {
    chat: GroupChat,
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLoader>,
}

impl GroupChatManager {
    pub fn new(chat: GroupChat, llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>) -> Self {
        Self { chat, llm, prompts }
    }

    /// Build the request for `agent` given the transcript so far
    ///
    /// The agent's own messages are replayed as assistant turns; everyone
    /// else's arrive as user turns tagged with the speaker's name.
    fn build_request(&self, agent: &Agent, history: &[ChatMessage]) -> Result<CompletionRequest, SessionError> {
        debug!(agent = %agent.name, history_len = history.len(), "build_request: called");
        let context = AgentPromptContext {
            name: agent.name.clone(),
            instruction: agent.instruction.clone(),
            participants: self.chat.roster().names().join(", "),
            is_lead: agent.kind == AgentKind::Lead,
        };
        let system_prompt = self
            .prompts
            .agent_prompt(&context)
            .map_err(|e| SessionError::Prompt(e.to_string()))?;

        let messages = history
            .iter()
            .map(|msg| {
                if msg.speaker == agent.name {
                    Message::assistant(msg.content.clone())
                } else {
                    Message::user(format!("[{}]: {}", msg.speaker, msg.content))
                }
            })
            .collect();

        Ok(CompletionRequest {
            system_prompt,
            messages,
            max_tokens: self.chat.roster().model().max_output_tokens,
        })
    }
}

#[async_trait]
impl ConversationSession for GroupChatManager {
    async fn initiate(&self, prompt: &str) -> Result<ChatResult, SessionError> {
        let id = Uuid::now_v7();
        let initiator = self.chat.roster().initiator().map(|a| a.name.as_str()).unwrap_or("user");
        debug!(%id, %initiator, max_round = self.chat.max_round(), "initiate: called");

        let mut history = vec![ChatMessage::new(initiator, prompt)];
        let mut usage = TokenUsage::default();
        // Stop reason of whichever message ends up as the summary
        let mut summary_stop = StopReason::EndTurn;

        for (turn, agent) in self.chat.speaker_order().into_iter().enumerate() {
            let round = turn + 2;
            debug!(%id, round, agent = %agent.name, "initiate: agent speaking");
            let request = self.build_request(agent, &history)?;
            let response = self
                .llm
                .complete(request)
                .await
                .map_err(|e| SessionError::from_agent(&agent.name, e))?;
            usage.add(&response.usage);

            let content = response.content.unwrap_or_default().trim().to_string();
            if content.is_empty() {
                warn!(%id, round, agent = %agent.name, "Agent returned an empty message");
                continue;
            }
            summary_stop = response.stop_reason;
            history.push(ChatMessage::new(&agent.name, content));
        }

        // Summary is the last thing an agent said
        let summary = history
            .iter()
            .skip(1)
            .last()
            .map(|msg| msg.content.clone())
            .ok_or(SessionError::EmptySummary)?;

        let truncated = summary_stop == StopReason::MaxTokens;
        if truncated {
            let speaker = history.last().map(|msg| msg.speaker.as_str()).unwrap_or_default();
            warn!(%id, %speaker, "Final message hit the token limit; itinerary may be cut short");
        }

        info!(
            %id,
            messages = history.len(),
            tokens = usage.total(),
            "Group chat complete"
        );
        Ok(ChatResult {
            id,
            summary,
            history,
            usage,
            truncated,
        })
    }
}
