//! StateManager - actor that owns the plan Store
//!
//! Processes commands via channels for thread-safe access to persistent state.

use std::path::Path;

use planstore::Store;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use super::messages::{StateCommand, StateError, StateResponse};
use crate::domain::{Plan, Task, UserInput};

/// Handle to send commands to the StateManager
#[derive(Clone)]
pub struct StateManager {
    tx: mpsc::Sender<StateCommand>,
}

impl StateManager {
    /// Spawn a new StateManager actor backed by the database at `store_path`
    pub fn spawn(store_path: impl AsRef<Path>) -> eyre::Result<Self> {
        debug!(store_path = %store_path.as_ref().display(), "spawn: called");
        let store = Store::open(store_path.as_ref())?;
        Ok(Self::spawn_with_store(store))
    }

    /// Spawn a StateManager around an already opened Store
    pub fn spawn_with_store(store: Store) -> Self {
        debug!("spawn_with_store: called");
        let (tx, rx) = mpsc::channel(64);

        tokio::spawn(actor_loop(store, rx));

        info!("StateManager spawned");

        Self { tx }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<StateResponse<T>>) -> StateCommand) -> StateResponse<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(build(reply_tx))
            .await
            .map_err(|_| StateError::ChannelError)?;
        reply_rx.await.map_err(|_| StateError::ChannelError)?
    }

    // === Plan operations ===

    /// Replace the stored plan
    pub async fn save_plan(&self, plan: Plan) -> StateResponse<()> {
        debug!(objectives = plan.objectives.len(), "save_plan: called");
        self.request(|reply| StateCommand::SavePlan { plan, reply }).await
    }

    /// Load the stored plan (empty when nothing has been saved)
    pub async fn load_plan(&self) -> StateResponse<Plan> {
        debug!("load_plan: called");
        self.request(|reply| StateCommand::LoadPlan { reply }).await
    }

    /// Update one task's content and status, returning the affected row count
    pub async fn update_task(&self, task: Task) -> StateResponse<usize> {
        debug!(task_id = %task.id, status = %task.status, "update_task: called");
        self.request(|reply| StateCommand::UpdateTask { task, reply }).await
    }

    // === Input log operations ===

    /// Append raw goal text to the input log
    pub async fn save_user_input(&self, weekly_goals: &str, overall_goals: &str) -> StateResponse<UserInput> {
        debug!("save_user_input: called");
        let weekly_goals = weekly_goals.to_string();
        let overall_goals = overall_goals.to_string();
        self.request(|reply| StateCommand::SaveUserInput {
            weekly_goals,
            overall_goals,
            reply,
        })
        .await
    }

    /// Most recent input, if any was ever recorded
    pub async fn latest_user_input(&self) -> StateResponse<Option<UserInput>> {
        debug!("latest_user_input: called");
        self.request(|reply| StateCommand::LatestUserInput { reply }).await
    }

    /// Shutdown the StateManager
    pub async fn shutdown(&self) -> Result<(), StateError> {
        debug!("shutdown: called");
        self.tx
            .send(StateCommand::Shutdown)
            .await
            .map_err(|_| StateError::ChannelError)
    }
}

fn store_err(e: eyre::Report) -> StateError {
    StateError::StoreError(format!("{:#}", e))
}

async fn actor_loop(mut store: Store, mut rx: mpsc::Receiver<StateCommand>) {
    debug!("StateManager actor started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            StateCommand::SavePlan { plan, reply } => {
                debug!(objectives = plan.objectives.len(), "actor_loop: SavePlan command");
                let result = store.save_plan(&plan).map_err(store_err);
                let _ = reply.send(result);
            }

            StateCommand::LoadPlan { reply } => {
                debug!("actor_loop: LoadPlan command");
                let _ = reply.send(store.load_plan().map_err(store_err));
            }

            StateCommand::UpdateTask { task, reply } => {
                debug!(task_id = %task.id, "actor_loop: UpdateTask command");
                let result = store.update_task(&task).map_err(store_err);
                if let Ok(0) = result {
                    debug!(task_id = %task.id, "actor_loop: UpdateTask matched no rows");
                }
                let _ = reply.send(result);
            }

            StateCommand::SaveUserInput {
                weekly_goals,
                overall_goals,
                reply,
            } => {
                debug!("actor_loop: SaveUserInput command");
                let result = store.save_user_input(&weekly_goals, &overall_goals).map_err(store_err);
                let _ = reply.send(result);
            }

            StateCommand::LatestUserInput { reply } => {
                debug!("actor_loop: LatestUserInput command");
                let _ = reply.send(store.latest_user_input().map_err(store_err));
            }

            StateCommand::Shutdown => {
                debug!("actor_loop: Shutdown command");
                info!("StateManager shutting down");
                break;
            }
        }
    }

    debug!("StateManager actor stopped");
}
