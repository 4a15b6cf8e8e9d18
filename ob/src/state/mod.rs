//! State management with actor pattern
//!
//! StateManager owns the plan Store and processes messages via channels,
//! providing serialised, thread-safe access to persistent state.

mod manager;
mod messages;

pub use manager::StateManager;
pub use messages::{StateCommand, StateError, StateResponse};
