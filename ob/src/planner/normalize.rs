//! Plan normalisation
//!
//! Runs after every successful decode. Fills in missing identifiers and
//! rewrites every task's parent link to the objective that contains it, so
//! whatever linkage the model echoed back is never trusted.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::{OBJECTIVE_PREFIX, Plan, TASK_PREFIX, generate_id};

/// Backfill ids and force parent links
///
/// Empty ids, and ids already used earlier in the plan, are replaced with
/// fresh `obj_`/`task_` ids that are unique within the plan. Objective and
/// task ids share one namespace.
pub fn normalize(mut plan: Plan) -> Plan {
    debug!(objectives = plan.objectives.len(), "normalize: called");
    let mut seen: HashSet<String> = HashSet::new();
    let mut generated = 0usize;

    for objective in &mut plan.objectives {
        if objective.id.is_empty() || seen.contains(&objective.id) {
            objective.id = unique_id(OBJECTIVE_PREFIX, &seen);
            generated += 1;
        }
        seen.insert(objective.id.clone());

        for task in &mut objective.tasks {
            if task.id.is_empty() || seen.contains(&task.id) {
                task.id = unique_id(TASK_PREFIX, &seen);
                generated += 1;
            }
            seen.insert(task.id.clone());
            task.obj_id.clone_from(&objective.id);
        }
    }

    debug!(generated, "normalize: done");
    plan
}

fn unique_id(prefix: &str, seen: &HashSet<String>) -> String {
    loop {
        let id = generate_id(prefix);
        if !seen.contains(&id) {
            return id;
        }
        debug!(%id, "unique_id: collision, regenerating");
    }
}
