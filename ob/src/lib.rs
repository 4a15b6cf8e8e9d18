//! okrboard - OKR goal planner
//!
//! okrboard turns free-text weekly and overall goals into a plan of
//! objectives and tasks by asking an OpenAI-compatible chat model, then keeps
//! that plan in SQLite so tasks can be ticked off.
//!
//! # Pipeline
//!
//! 1. Render a deterministic prompt embedding both goals verbatim
//! 2. Make one chat-completion call (no retries)
//! 3. Strip a markdown code fence from the reply
//! 4. Decode the reply into a strict plan shape
//! 5. Backfill missing ids and force every task's parent link
//!
//! # Modules
//!
//! - [`llm`] - LLM client trait and OpenAI implementation
//! - [`prompts`] - Embedded prompt templates
//! - [`planner`] - Fence stripping, decoding, normalisation and generation
//! - [`state`] - Actor owning the plan store
//! - [`service`] - Orchestration used by every front end
//! - [`web`] - HTTP API
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod llm;
pub mod planner;
pub mod prompts;
pub mod service;
pub mod state;
pub mod web;

// Re-export commonly used types
pub use config::{Config, LlmConfig, ResolvedLlmConfig};
pub use domain::{Objective, Plan, Task, TaskStatus, UserInput};
pub use llm::{LlmClient, LlmError, OpenAIClient, create_client};
pub use planner::{ErrorKind, PlanError, PlanGenerator};
pub use service::{PlanService, ServiceError};
pub use state::{StateError, StateManager};
