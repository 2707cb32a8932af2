//! Task filtering and pagination windows.
//!
//! # Responsibility
//! - Parse raw query parameters into a typed filter and page window.
//! - Provide the in-memory predicate that SQL listing mirrors.
//!
//! # Invariants
//! - Filters are conjunctive; an unset filter matches everything.
//! - Deadline bounds are inclusive on both ends and independent.
//! - `page` and `limit` are always >= 1 once normalized.
//!
//! Offset pagination has no snapshot: concurrent inserts shift later pages.

use crate::model::task::{Task, TaskPriority, TaskStatus};
use crate::model::time::parse_timestamp;
use crate::model::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// Conjunctive task filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// Inclusive lower deadline bound.
    pub deadline_from: Option<DateTime<Utc>>,
    /// Inclusive upper deadline bound.
    pub deadline_to: Option<DateTime<Utc>>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.status.map_or(true, |status| task.status == status)
            && self.priority.map_or(true, |priority| task.priority == priority)
            && self.deadline_from.map_or(true, |from| task.deadline >= from)
            && self.deadline_to.map_or(true, |to| task.deadline <= to)
    }
}

/// One-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Normalizes raw values: anything missing or below 1 falls back to the default.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: positive_or(page, DEFAULT_PAGE),
            limit: positive_or(limit, DEFAULT_LIMIT),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Rows skipped before the window: `(page - 1) * limit`.
    pub fn skip(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Slices an already ordered list down to this window.
    pub fn window<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = usize::try_from(self.skip())
            .unwrap_or(usize::MAX)
            .min(items.len());
        let end = start.saturating_add(self.limit as usize).min(items.len());
        &items[start..end]
    }
}

fn positive_or(value: Option<i64>, fallback: u32) -> u32 {
    match value {
        Some(raw) if raw >= 1 => u32::try_from(raw).unwrap_or(u32::MAX),
        _ => fallback,
    }
}

/// Raw task-list query string as sent by clients.
///
/// Everything arrives as text so that lenient fields (`page`, `limit`) can
/// fall back to defaults instead of rejecting the whole request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQueryParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
}

impl TaskQueryParams {
    /// Parses the filter half of the query.
    ///
    /// # Errors
    /// - `InvalidChoice` for unknown status/priority values.
    /// - `InvalidTimestamp` for unparseable date bounds.
    pub fn filter(&self) -> Result<TaskFilter, ValidationError> {
        let status = match present(&self.status) {
            Some(raw) => Some(TaskStatus::parse(raw).ok_or_else(|| {
                ValidationError::InvalidChoice {
                    field: "status",
                    value: raw.to_string(),
                    expected: "todo|in-progress|done",
                }
            })?),
            None => None,
        };
        let priority = match present(&self.priority) {
            Some(raw) => Some(TaskPriority::parse(raw).ok_or_else(|| {
                ValidationError::InvalidChoice {
                    field: "priority",
                    value: raw.to_string(),
                    expected: "low|medium|high",
                }
            })?),
            None => None,
        };

        Ok(TaskFilter {
            status,
            priority,
            deadline_from: date_bound(&self.start_date, "startDate")?,
            deadline_to: date_bound(&self.end_date, "endDate")?,
        })
    }

    /// Parses the window half of the query; never fails.
    pub fn pagination(&self) -> Pagination {
        let parse = |value: &Option<String>| present(value).and_then(|raw| raw.parse::<i64>().ok());
        Pagination::new(parse(&self.page), parse(&self.limit))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|raw| !raw.is_empty())
}

fn date_bound(
    value: &Option<String>,
    field: &'static str,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
    match present(value) {
        Some(raw) => parse_timestamp(raw)
            .map(Some)
            .ok_or_else(|| ValidationError::InvalidTimestamp {
                field,
                value: raw.to_string(),
            }),
        None => Ok(None),
    }
}
