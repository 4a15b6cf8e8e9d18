//! Plan JSON decoding
//!
//! The top level must be an object with an `objectives` array. Below that the
//! decoder is permissive: missing or `null` strings become empty, a missing
//! `tasks` list is empty and an unknown `status` falls back to `todo`.

use serde::Deserialize;
use tracing::{debug, warn};

use super::PlanError;
use crate::domain::{Objective, Plan, Task, TaskStatus};

#[derive(Debug, Deserialize)]
struct WirePlan {
    objectives: Vec<WireObjective>,
}

#[derive(Debug, Deserialize)]
struct WireObjective {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    tasks: Option<Vec<WireTask>>,
}

#[derive(Debug, Deserialize)]
struct WireTask {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    obj_id: Option<String>,
}

impl From<WireTask> for Task {
    fn from(wire: WireTask) -> Self {
        let status = match wire.status.as_deref().map(str::trim) {
            None | Some("") => TaskStatus::default(),
            Some(s) => TaskStatus::parse(s).unwrap_or_else(|| {
                warn!(status = %s, "decode: unknown task status, using todo");
                TaskStatus::default()
            }),
        };
        Task {
            id: wire.id.unwrap_or_default(),
            content: wire.content.unwrap_or_default(),
            status,
            obj_id: wire.obj_id.unwrap_or_default(),
        }
    }
}

impl From<WireObjective> for Objective {
    fn from(wire: WireObjective) -> Self {
        Objective {
            id: wire.id.unwrap_or_default(),
            title: wire.title.unwrap_or_default(),
            tasks: wire.tasks.unwrap_or_default().into_iter().map(Task::from).collect(),
        }
    }
}

/// Decode cleaned reply text into a plan
pub fn decode_plan(text: &str) -> Result<Plan, PlanError> {
    debug!(text_len = text.len(), "decode_plan: called");
    let wire: WirePlan = serde_json::from_str(text).map_err(|e| {
        debug!(error = %e, "decode_plan: invalid plan JSON");
        PlanError::Decode(e)
    })?;

    let plan = Plan {
        objectives: wire.objectives.into_iter().map(Objective::from).collect(),
    };
    debug!(
        objectives = plan.objectives.len(),
        tasks = plan.task_count(),
        "decode_plan: decoded"
    );
    Ok(plan)
}
