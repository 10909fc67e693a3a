//! Agent roster
//!
//! The fixed set of conversational roles that plan a trip together. Agents
//! are pure data; the group chat in [`crate::chat`] gives them a voice.

mod roster;

pub use roster::{Agent, AgentKind, Roster};
