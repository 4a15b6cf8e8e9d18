//! Plan generator

use std::sync::Arc;

use tracing::{debug, info};

use super::{PlanError, decode_plan, normalize, strip_code_fence};
use crate::domain::Plan;
use crate::llm::{CompletionRequest, LlmClient, Message};
use crate::prompts::PromptRenderer;

/// Sampling temperature for plan generation
pub const TEMPERATURE: f32 = 0.7;

/// Token ceiling for the model's reply
pub const MAX_TOKENS: u32 = 2000;

/// Turns goal text into a normalised plan with one completion call
///
/// Has no side effects besides the outbound call; persisting the result is
/// the caller's job.
pub struct PlanGenerator {
    llm: Arc<dyn LlmClient>,
    prompts: PromptRenderer,
}

impl PlanGenerator {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        debug!("PlanGenerator::new: called");
        Self {
            llm,
            prompts: PromptRenderer::new(),
        }
    }

    /// Build the completion request for a pair of goals
    pub fn build_request(&self, weekly_goals: &str, overall_goals: &str) -> Result<CompletionRequest, PlanError> {
        debug!("PlanGenerator::build_request: called");
        let prompt = self
            .prompts
            .plan_prompt(weekly_goals, overall_goals)
            .map_err(|e| PlanError::Prompt(e.to_string()))?;

        Ok(CompletionRequest {
            messages: vec![Message::user(prompt)],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        })
    }

    /// Generate a plan from weekly and overall goals
    pub async fn generate(&self, weekly_goals: &str, overall_goals: &str) -> Result<Plan, PlanError> {
        debug!(
            weekly_len = weekly_goals.len(),
            overall_len = overall_goals.len(),
            "PlanGenerator::generate: called"
        );
        let request = self.build_request(weekly_goals, overall_goals)?;
        let response = self.llm.complete(request).await?;

        let cleaned = strip_code_fence(&response.content);
        let plan = normalize(decode_plan(cleaned)?);

        info!(
            objectives = plan.objectives.len(),
            tasks = plan.task_count(),
            tokens = response.usage.total(),
            "Generated plan"
        );
        Ok(plan)
    }
}
