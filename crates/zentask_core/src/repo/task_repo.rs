//! Task repository contract and SQLite implementation.
//!
//! # Invariants
//! - Listing order is `created_at DESC`, ties broken by insertion order (newest first).
//! - SQL filtering agrees with `TaskFilter::matches`.
//! - Updates write the whole row; concurrent writers race and the last one wins.

use super::{timestamp_column, uuid_column, RepoError, RepoResult};
use crate::board::filter::{Pagination, TaskFilter};
use crate::model::project::ProjectId;
use crate::model::task::{Task, TaskId, TaskPriority, TaskStatus};
use crate::model::time::to_epoch_millis;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    status,
    priority,
    deadline,
    project_id,
    created_at,
    updated_at
FROM tasks";

/// Query options for listing tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskListQuery {
    /// Restrict to one project; `None` lists across all projects.
    pub project_id: Option<ProjectId>,
    pub filter: TaskFilter,
    /// `None` returns every match.
    pub window: Option<Pagination>,
}

/// Repository interface for task CRUD operations.
pub trait TaskRepository {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        self.conn.execute(
            "INSERT INTO tasks (
                uuid,
                title,
                status,
                priority,
                deadline,
                project_id,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                task.id.to_string(),
                task.title.as_str(),
                task.status.as_str(),
                task.priority.as_str(),
                to_epoch_millis(task.deadline),
                task.project_id.to_string(),
                to_epoch_millis(task.created_at),
                to_epoch_millis(task.updated_at),
            ],
        )?;

        Ok(task.id)
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                title = ?1,
                status = ?2,
                priority = ?3,
                deadline = ?4,
                project_id = ?5,
                updated_at = ?6
             WHERE uuid = ?7;",
            params![
                task.title.as_str(),
                task.status.as_str(),
                task.priority.as_str(),
                to_epoch_millis(task.deadline),
                task.project_id.to_string(),
                to_epoch_millis(task.updated_at),
                task.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(task.id));
        }

        Ok(())
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(project_id) = query.project_id {
            sql.push_str(" AND project_id = ?");
            bind_values.push(Value::Text(project_id.to_string()));
        }
        if let Some(status) = query.filter.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status.as_str().to_string()));
        }
        if let Some(priority) = query.filter.priority {
            sql.push_str(" AND priority = ?");
            bind_values.push(Value::Text(priority.as_str().to_string()));
        }
        if let Some(from) = query.filter.deadline_from {
            sql.push_str(" AND deadline >= ?");
            bind_values.push(Value::Integer(to_epoch_millis(from)));
        }
        if let Some(to) = query.filter.deadline_to {
            sql.push_str(" AND deadline <= ?");
            bind_values.push(Value::Integer(to_epoch_millis(to)));
        }

        sql.push_str(" ORDER BY created_at DESC, rowid DESC");

        if let Some(window) = query.window {
            sql.push_str(" LIMIT ? OFFSET ?");
            bind_values.push(Value::Integer(i64::from(window.limit())));
            bind_values.push(Value::Integer(
                i64::try_from(window.skip()).unwrap_or(i64::MAX),
            ));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let status_text: String = row.get("status")?;
    let status = TaskStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid task status `{status_text}` in tasks.status"))
    })?;

    let priority_text: String = row.get("priority")?;
    let priority = TaskPriority::parse(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid task priority `{priority_text}` in tasks.priority"
        ))
    })?;

    Ok(Task {
        id: uuid_column(row, "uuid", "tasks")?,
        title: row.get("title")?,
        status,
        priority,
        deadline: timestamp_column(row, "deadline", "tasks")?,
        project_id: uuid_column(row, "project_id", "tasks")?,
        created_at: timestamp_column(row, "created_at", "tasks")?,
        updated_at: timestamp_column(row, "updated_at", "tasks")?,
    })
}
