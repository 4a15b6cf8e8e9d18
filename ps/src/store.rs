//! SQLite-backed plan store

use std::path::Path;
use std::time::Duration;

use eyre::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info, warn};

use crate::model::{Objective, Plan, Task, TaskStatus, UserInput};

/// How long a writer waits on a lock held by another process (CLI vs server)
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS objectives (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    position INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS tasks (
    id TEXT PRIMARY KEY,
    content TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'todo',
    obj_id TEXT NOT NULL,
    position INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY(obj_id) REFERENCES objectives(id)
);

CREATE TABLE IF NOT EXISTS user_inputs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    weekly_goals TEXT,
    overall_goals TEXT,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#;

/// Persistent store for the current plan and the raw input log
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a store at the given database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create store directory {}", parent.display()))?;
        }

        let conn = Connection::open(path).context(format!("Failed to open database {}", path.display()))?;
        let store = Self::init(conn)?;
        debug!(path = %path.display(), "Opened plan store");
        Ok(store)
    }

    /// Open a throwaway in-memory store
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT).context("Failed to set busy timeout")?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .context("Failed to enable foreign keys")?;
        conn.execute_batch(SCHEMA).context("Failed to initialize schema")?;

        let store = Self { conn };
        store.apply_migrations()?;
        Ok(store)
    }

    /// Databases created before ordering was tracked lack the position column
    fn apply_migrations(&self) -> Result<()> {
        for table in ["objectives", "tasks"] {
            if !self.has_column(table, "position")? {
                info!(table, "Adding position column");
                self.conn
                    .execute(
                        &format!("ALTER TABLE {} ADD COLUMN position INTEGER NOT NULL DEFAULT 0", table),
                        [],
                    )
                    .context(format!("Failed to add position column to {}", table))?;
            }
        }
        Ok(())
    }

    fn has_column(&self, table: &str, column: &str) -> Result<bool> {
        debug!(table, column, "has_column: called");
        let count: i64 = self
            .conn
            .query_row(
                &format!("SELECT COUNT(*) FROM pragma_table_info('{}') WHERE name = ?1", table),
                params![column],
                |row| row.get(0),
            )
            .context(format!("Failed to inspect columns of {}", table))?;
        Ok(count > 0)
    }

    /// Replace the stored plan with `plan`
    ///
    /// Clears both tables and inserts the new rows inside one transaction, so a
    /// failed insert leaves the previous plan intact.
    pub fn save_plan(&mut self, plan: &Plan) -> Result<()> {
        debug!(objectives = plan.objectives.len(), tasks = plan.task_count(), "save_plan: called");
        let now = chrono::Utc::now().to_rfc3339();
        let tx = self.conn.transaction().context("Failed to begin transaction")?;

        tx.execute("DELETE FROM tasks", []).context("Failed to clear tasks")?;
        tx.execute("DELETE FROM objectives", [])
            .context("Failed to clear objectives")?;

        for (obj_pos, obj) in plan.objectives.iter().enumerate() {
            tx.execute(
                "INSERT INTO objectives (id, title, position, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![obj.id, obj.title, obj_pos as i64, now],
            )
            .context(format!("Failed to insert objective {}", obj.id))?;

            for (task_pos, task) in obj.tasks.iter().enumerate() {
                tx.execute(
                    "INSERT INTO tasks (id, content, status, obj_id, position, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![task.id, task.content, task.status.as_str(), obj.id, task_pos as i64, now],
                )
                .context(format!("Failed to insert task {}", task.id))?;
            }
        }

        tx.commit().context("Failed to commit plan")?;
        info!(objectives = plan.objectives.len(), tasks = plan.task_count(), "Saved plan");
        Ok(())
    }

    /// Load the stored plan; an empty store yields an empty plan
    pub fn load_plan(&self) -> Result<Plan> {
        debug!("load_plan: called");
        let mut obj_stmt = self
            .conn
            .prepare("SELECT id, title FROM objectives ORDER BY position, rowid")
            .context("Failed to prepare objective query")?;
        let mut task_stmt = self
            .conn
            .prepare("SELECT id, content, status FROM tasks WHERE obj_id = ?1 ORDER BY position, rowid")
            .context("Failed to prepare task query")?;

        let rows = obj_stmt
            .query_map([], |row| Ok(Objective::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
            .context("Failed to query objectives")?;

        let mut objectives = Vec::new();
        for row in rows {
            let mut obj = row.context("Failed to read objective row")?;

            let tasks = task_stmt
                .query_map(params![obj.id], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                })
                .context(format!("Failed to query tasks for {}", obj.id))?;

            for task in tasks {
                let (id, content, status) = task.context("Failed to read task row")?;
                let status = TaskStatus::parse(&status).unwrap_or_else(|| {
                    warn!(%id, %status, "Unknown task status in store, treating as todo");
                    TaskStatus::Todo
                });
                obj.tasks.push(Task {
                    id,
                    content,
                    status,
                    obj_id: obj.id.clone(),
                });
            }

            objectives.push(obj);
        }

        Ok(Plan { objectives })
    }

    /// Update a task's content and status by id
    ///
    /// Returns the number of rows changed; an unknown id changes nothing and is
    /// not an error.
    pub fn update_task(&self, task: &Task) -> Result<usize> {
        debug!(id = %task.id, status = %task.status, "update_task: called");
        let changed = self
            .conn
            .execute(
                "UPDATE tasks SET content = ?1, status = ?2 WHERE id = ?3",
                params![task.content, task.status.as_str(), task.id],
            )
            .context(format!("Failed to update task {}", task.id))?;

        if changed == 0 {
            debug!(id = %task.id, "update_task: no matching task");
        }
        Ok(changed)
    }

    /// Append a raw input record to the log
    pub fn save_user_input(&self, weekly_goals: &str, overall_goals: &str) -> Result<UserInput> {
        debug!(
            weekly_len = weekly_goals.len(),
            overall_len = overall_goals.len(),
            "save_user_input: called"
        );
        let created_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO user_inputs (weekly_goals, overall_goals, created_at) VALUES (?1, ?2, ?3)",
                params![weekly_goals, overall_goals, created_at],
            )
            .context("Failed to save user input")?;

        Ok(UserInput {
            weekly_goals: weekly_goals.to_string(),
            overall_goals: overall_goals.to_string(),
            created_at,
        })
    }

    /// Most recently recorded input, if any
    pub fn latest_user_input(&self) -> Result<Option<UserInput>> {
        debug!("latest_user_input: called");
        self.conn
            .query_row(
                "SELECT weekly_goals, overall_goals, created_at FROM user_inputs ORDER BY id DESC LIMIT 1",
                [],
                user_input_from_row,
            )
            .optional()
            .context("Failed to load latest user input")
    }

    /// Recorded inputs, newest first
    pub fn list_user_inputs(&self, limit: usize) -> Result<Vec<UserInput>> {
        debug!(limit, "list_user_inputs: called");
        let mut stmt = self
            .conn
            .prepare("SELECT weekly_goals, overall_goals, created_at FROM user_inputs ORDER BY id DESC LIMIT ?1")
            .context("Failed to prepare input history query")?;

        let rows = stmt
            .query_map(params![limit as i64], user_input_from_row)
            .context("Failed to query input history")?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read input history")
    }
}

fn user_input_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserInput> {
    Ok(UserInput {
        weekly_goals: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
        overall_goals: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        created_at: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
    })
}
