use tracing::debug;

use crate::config::ModelConfig;

/// How an agent takes part in the chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    /// Stands in for the human; posts the task and never calls the model
    HumanProxy,
    /// Model-backed specialist
    Assistant,
    /// Model-backed coordinator that owns the final itinerary
    Lead,
}

/// One named role with its standing instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub name: String,
    pub instruction: String,
    pub kind: AgentKind,
}

impl Agent {
    fn new(name: &str, instruction: &str, kind: AgentKind) -> Self {
        Self {
            name: name.to_string(),
            instruction: instruction.to_string(),
            kind,
        }
    }

    pub fn uses_model(&self) -> bool {
        self.kind != AgentKind::HumanProxy
    }
}

/// The travel planning team plus the model settings they share
#[derive(Debug, Clone)]
pub struct Roster {
    agents: Vec<Agent>,
    model: ModelConfig,
}

impl Roster {
    /// The standard four-member travel team
    pub fn travel(model: ModelConfig) -> Self {
        debug!(?model, "Roster::travel: called");
        Self {
            agents: vec![
                Agent::new("traveler", "A Human Travel Enthusiast", AgentKind::HumanProxy),
                Agent::new("transport", "Handles transport logistics.", AgentKind::Assistant),
                Agent::new("stay", "Finds best stays.", AgentKind::Assistant),
                Agent::new("lead", "Manages itinerary.", AgentKind::Lead),
            ],
            model,
        }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn model(&self) -> &ModelConfig {
        &self.model
    }

    /// The member that opens the chat on the human's behalf
    pub fn initiator(&self) -> Option<&Agent> {
        self.agents.iter().find(|a| a.kind == AgentKind::HumanProxy)
    }

    /// Members that speak through the model, in turn order
    pub fn speakers(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter().filter(|a| a.uses_model())
    }

    pub fn names(&self) -> Vec<&str> {
        self.agents.iter().map(|a| a.name.as_str()).collect()
    }
}
