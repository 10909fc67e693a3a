//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Trip planning task sent to the group chat
pub const ITINERARY: &str = include_str!("../../prompts/itinerary.pmt");

/// System prompt for each speaking agent
pub const AGENT: &str = include_str!("../../prompts/agent.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "itinerary" => Some(ITINERARY),
        "agent" => Some(AGENT),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
