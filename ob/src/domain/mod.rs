//! Domain types for okrboard
//!
//! Plan, Objective, Task and UserInput live in the `planstore` crate so the
//! store and its inspection binary share them; they are re-exported here
//! together with identifier generation.

mod id;

pub use id::{OBJECTIVE_PREFIX, TASK_PREFIX, generate_id};

// Re-export planstore types for convenience
pub use planstore::{Objective, Plan, Task, TaskStatus, UserInput};
