//! State manager messages
//!
//! Commands and responses for the actor pattern.

use thiserror::Error;
use tokio::sync::oneshot;

use crate::domain::{Plan, Task, UserInput};

/// Errors from state operations
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Channel error")]
    ChannelError,
}

/// Response from state operations
pub type StateResponse<T> = Result<T, StateError>;

/// Commands sent to the StateManager actor
#[derive(Debug)]
pub enum StateCommand {
    // Plan operations
    SavePlan {
        plan: Plan,
        reply: oneshot::Sender<StateResponse<()>>,
    },
    LoadPlan {
        reply: oneshot::Sender<StateResponse<Plan>>,
    },
    UpdateTask {
        task: Task,
        reply: oneshot::Sender<StateResponse<usize>>,
    },

    // Input log operations
    SaveUserInput {
        weekly_goals: String,
        overall_goals: String,
        reply: oneshot::Sender<StateResponse<UserInput>>,
    },
    LatestUserInput {
        reply: oneshot::Sender<StateResponse<Option<UserInput>>>,
    },

    // Control
    Shutdown,
}
