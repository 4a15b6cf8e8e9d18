//! PlanStore - SQLite persistence for OKR plans
//!
//! Stores exactly one current plan (objectives + tasks) and an append-only log
//! of the raw goal text each plan was generated from. Every front end opens
//! the same database file, so edits made from the browser show up in the CLI
//! and vice versa.
//!
//! # Example
//!
//! ```ignore
//! use planstore::{Plan, Store};
//!
//! let mut store = Store::open(planstore::default_db_path())?;
//! store.save_user_input("ship v1", "grow users")?;
//! store.save_plan(&plan)?;
//! let current = store.load_plan()?;
//! ```

pub mod cli;
mod model;
mod store;

use std::path::PathBuf;

pub use model::{Objective, Plan, Task, TaskStatus, UserInput};
pub use store::Store;

/// Default database location (`~/.local/share/okrboard/data.db` on Linux)
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("okrboard")
        .join("data.db")
}
