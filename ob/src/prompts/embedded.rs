//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Goal decomposition prompt
pub const PLAN: &str = include_str!("../../prompts/plan.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "plan" => {
            debug!("get_embedded: matched plan");
            Some(PLAN)
        }
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
