//! Plan orchestration
//!
//! Sequences "log input → generate → persist" and exposes read/update
//! passthroughs for the front ends.

use std::path::Path;
use std::sync::Arc;

use eyre::Context;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ResolvedLlmConfig;
use crate::domain::{Plan, Task, UserInput};
use crate::llm::create_client;
use crate::planner::{PlanError, PlanGenerator};
use crate::state::{StateError, StateManager};

/// Errors surfaced to front ends
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("Storage error: {0}")]
    State(#[from] StateError),
}

/// Glue between the plan generator and the store
#[derive(Clone)]
pub struct PlanService {
    generator: Arc<PlanGenerator>,
    state: StateManager,
}

impl PlanService {
    pub fn new(generator: PlanGenerator, state: StateManager) -> Self {
        debug!("PlanService::new: called");
        Self {
            generator: Arc::new(generator),
            state,
        }
    }

    /// Wire a real client and store actor from an already resolved config
    ///
    /// The environment is not consulted here; callers resolve once and pass
    /// the result along.
    pub fn open(llm: &ResolvedLlmConfig, db_path: impl AsRef<Path>) -> eyre::Result<Self> {
        debug!(model = %llm.model, db_path = %db_path.as_ref().display(), "PlanService::open: called");
        let client = create_client(llm).context("Failed to create LLM client")?;
        let state = StateManager::spawn(db_path).context("Failed to open plan store")?;
        Ok(Self::new(PlanGenerator::new(client), state))
    }

    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Ingest goals and replace the stored plan
    ///
    /// The input log write is best effort. A plan is only persisted after a
    /// successful generation, and a failed save is reported even though the
    /// remote call already succeeded.
    pub async fn process_goals(&self, weekly_goals: &str, overall_goals: &str) -> Result<Plan, ServiceError> {
        debug!("PlanService::process_goals: called");
        if let Err(e) = self.state.save_user_input(weekly_goals, overall_goals).await {
            warn!(error = %e, "Failed to record user input, continuing");
        }

        let plan = self.generator.generate(weekly_goals, overall_goals).await.map_err(|e| {
            warn!(kind = %e.kind(), error = %e, "Plan generation failed");
            e
        })?;

        self.state.save_plan(plan.clone()).await?;
        info!(
            objectives = plan.objectives.len(),
            tasks = plan.task_count(),
            "Stored new plan"
        );
        Ok(plan)
    }

    /// The stored plan, empty when none has been generated yet
    pub async fn current_plan(&self) -> Result<Plan, ServiceError> {
        debug!("PlanService::current_plan: called");
        Ok(self.state.load_plan().await?)
    }

    /// Update a task's content and status by id; unknown ids are a no-op
    pub async fn update_task(&self, task: Task) -> Result<(), ServiceError> {
        debug!(task_id = %task.id, "PlanService::update_task: called");
        let updated = self.state.update_task(task).await?;
        debug!(updated, "PlanService::update_task: done");
        Ok(())
    }

    /// The most recent raw input, empty when none was recorded
    pub async fn latest_user_input(&self) -> Result<UserInput, ServiceError> {
        debug!("PlanService::latest_user_input: called");
        Ok(self.state.latest_user_input().await?.unwrap_or_default())
    }
}
