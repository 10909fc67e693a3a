//! Conversation session
//!
//! Wraps the agent roster into a turn-bounded group chat. The pipeline only
//! sees the [`ConversationSession`] trait and reads the final summary.

mod manager;
pub mod session;

pub use manager::{GroupChat, GroupChatManager};
pub use session::{ChatMessage, ChatResult, ConversationSession, SessionError};
