//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::embedded;
use crate::domain::TripRequest;

/// Context for the itinerary task template
#[derive(Debug, Clone, Serialize)]
pub struct TripPromptContext {
    pub departure: String,
    pub destination: String,
    pub dates: String,
    pub budget: u32,
    /// Comma-joined, empty when no activity was picked
    pub activities: String,
    pub accommodation: String,
    pub transport: String,
}

impl From<&TripRequest> for TripPromptContext {
    fn from(trip: &TripRequest) -> Self {
        Self {
            departure: trip.departure.clone(),
            destination: trip.destination.clone(),
            dates: trip.dates.clone(),
            budget: trip.budget,
            activities: trip.activities_list(),
            accommodation: trip.accommodation.to_string(),
            transport: trip.transport.to_string(),
        }
    }
}

/// Context for a group chat member's system prompt
#[derive(Debug, Clone, Serialize)]
pub struct AgentPromptContext {
    pub name: String,
    pub instruction: String,
    /// Comma-joined names of everyone in the chat
    pub participants: String,
    pub is_lead: bool,
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (e.g., `.tripplanner/prompts/`)
    user_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a new prompt loader rooted at `root`
    ///
    /// Overrides are looked up in `{root}/.tripplanner/prompts/`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let user_dir = root.as_ref().join(".tripplanner/prompts");
        let user_dir_exists = user_dir.exists();
        debug!(?user_dir, %user_dir_exists, "PromptLoader::new: called");

        Self {
            hbs: Self::engine(),
            user_dir: if user_dir_exists { Some(user_dir) } else { None },
        }
    }

    /// Create a loader that only uses embedded prompts (for testing)
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            user_dir: None,
        }
    }

    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        // Prompts are plain text; HTML escaping would mangle "&" and quotes
        hbs.register_escape_fn(handlebars::no_escape);
        hbs.set_strict_mode(true);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. User override: `.tripplanner/prompts/{name}.pmt`
    /// 2. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref user_dir) = self.user_dir {
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found in user override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read user prompt {}: {}", path.display(), e));
            }
            debug!(?path, "PromptLoader::load_template: not found in user override");
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!(%name, "PromptLoader::load_template: found in embedded");
            return Ok(content.to_string());
        }

        debug!(%name, "PromptLoader::load_template: not found anywhere");
        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        debug!(%template_name, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;
        self.hbs
            .render_template(&template, context)
            .map(|rendered| rendered.trim_end().to_string())
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }

    /// Render the trip planning task for a request
    pub fn trip_prompt(&self, trip: &TripRequest) -> Result<String> {
        self.render("itinerary", &TripPromptContext::from(trip))
    }

    /// Render a group chat member's system prompt
    pub fn agent_prompt(&self, context: &AgentPromptContext) -> Result<String> {
        self.render("agent", context)
    }
}
