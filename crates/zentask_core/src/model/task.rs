//! Task domain model.
//!
//! # Responsibility
//! - Define the task record and its closed status/priority enumerations.
//! - Validate create payloads and apply partial updates.
//!
//! # Invariants
//! - `title` is never blank.
//! - `status` and `priority` only hold their enumerated values.
//! - `project_id` is an advisory reference; it is not checked against storage.

use super::project::ProjectId;
use super::time::{now_millis, parse_timestamp};
use super::{non_blank, parse_reference, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type TaskId = Uuid;

/// Kanban column a task sits in.
///
/// Any status may move to any other; there is no transition table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Board column order.
    pub const ALL: [TaskStatus; 3] = [Self::Todo, Self::InProgress, Self::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "todo" => Some(Self::Todo),
            "in-progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }

    /// Human label used by board renderers.
    pub fn label(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl Display for TaskPriority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of work belonging to exactly one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub deadline: DateTime<Utc>,
    pub project_id: ProjectId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// A task is overdue once its deadline has passed, whatever its status.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.deadline < now
    }
}

/// Create payload as received from callers.
///
/// Every field is optional at the decoding layer so that missing values
/// surface as validation messages rather than decoder errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    /// RFC 3339 timestamp or `YYYY-MM-DD` (midnight UTC).
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
}

impl NewTask {
    /// Builds a fresh task record from this payload.
    ///
    /// Checks run in a fixed order: title, project reference, deadline.
    ///
    /// # Errors
    /// - `MissingField` for an absent/blank title, project id or deadline.
    /// - `InvalidIdentifier` when `project_id` is not a UUID.
    /// - `InvalidTimestamp` when `deadline` is neither RFC 3339 nor a plain date.
    pub fn validate(&self) -> Result<Task, ValidationError> {
        let title = non_blank(self.title.as_deref())
            .ok_or(ValidationError::MissingField("Task title is required"))?;
        let project_id = parse_reference(
            self.project_id.as_deref(),
            "projectId",
            "Project ID is required",
        )?;
        let deadline = parse_deadline(self.deadline.as_deref())?;

        let now = now_millis();
        Ok(Task {
            id: Uuid::new_v4(),
            title,
            status: self.status.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            deadline,
            project_id,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update: only supplied fields change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

impl TaskPatch {
    /// Patch that carries only a new status, as issued by a board move.
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.deadline.is_none()
            && self.project_id.is_none()
    }

    /// Applies supplied fields onto `task` and bumps `updated_at`.
    ///
    /// Validation happens before any field is written, so a rejected patch
    /// leaves `task` untouched.
    pub fn apply_to(&self, task: &mut Task) -> Result<(), ValidationError> {
        let title = match self.title.as_deref() {
            Some(raw) => Some(
                non_blank(Some(raw))
                    .ok_or(ValidationError::MissingField("Task title is required"))?,
            ),
            None => None,
        };
        let project_id = match self.project_id.as_deref() {
            Some(raw) => Some(parse_reference(
                Some(raw),
                "projectId",
                "Project ID is required",
            )?),
            None => None,
        };
        let deadline = match self.deadline.as_deref() {
            Some(raw) => Some(parse_deadline(Some(raw))?),
            None => None,
        };

        if let Some(title) = title {
            task.title = title;
        }
        if let Some(project_id) = project_id {
            task.project_id = project_id;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(deadline) = deadline {
            task.deadline = deadline;
        }
        task.updated_at = now_millis().max(task.updated_at);
        Ok(())
    }
}

fn parse_deadline(value: Option<&str>) -> Result<DateTime<Utc>, ValidationError> {
    let raw = non_blank(value).ok_or(ValidationError::MissingField("Task deadline is required"))?;
    parse_timestamp(&raw).ok_or(ValidationError::InvalidTimestamp {
        field: "deadline",
        value: raw,
    })
}
