//! Kanban board grouping and card moves.
//!
//! # Responsibility
//! - Group tasks into the fixed status columns.
//! - Apply a move locally and either commit the server result or roll back.
//!
//! # Invariants
//! - A board always has exactly one column per `TaskStatus`, in `TaskStatus::ALL` order.
//! - Each task id appears in exactly one column.
//! - Columns keep newest-created tasks first.
//! - `rollback` restores the board to the exact state before `apply_move`.

use crate::model::task::{Task, TaskId, TaskStatus};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub status: TaskStatus,
    pub label: String,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    UnknownTask(TaskId),
    /// The pending move no longer matches the board (already resolved or stale).
    StaleMove(TaskId),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTask(id) => write!(f, "task not on board: {id}"),
            Self::StaleMove(id) => write!(f, "pending move for task {id} no longer applies"),
        }
    }
}

impl Error for BoardError {}

/// A card move applied locally but not yet confirmed by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    pub task_id: TaskId,
    pub from: TaskStatus,
    pub to: TaskStatus,
    from_index: usize,
    original: Task,
}

impl Board {
    /// Groups tasks by status, preserving the input order inside each column.
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut columns: Vec<Column> = TaskStatus::ALL
            .iter()
            .map(|status| Column {
                status: *status,
                label: status.label().to_string(),
                tasks: Vec::new(),
            })
            .collect();

        for task in tasks {
            columns[column_index(task.status)].tasks.push(task);
        }

        Self { columns }
    }

    pub fn column(&self, status: TaskStatus) -> &Column {
        &self.columns[column_index(status)]
    }

    pub fn len(&self) -> usize {
        self.columns.iter().map(|column| column.tasks.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find(&self, task_id: TaskId) -> Option<&Task> {
        self.columns
            .iter()
            .flat_map(|column| column.tasks.iter())
            .find(|task| task.id == task_id)
    }

    /// Moves a card to `to` immediately and returns the handle needed to
    /// commit or undo it.
    ///
    /// Returns `Ok(None)` when the card already sits in `to`; nothing changes
    /// and no server call is needed.
    pub fn apply_move(
        &mut self,
        task_id: TaskId,
        to: TaskStatus,
    ) -> Result<Option<PendingMove>, BoardError> {
        let (from_col, from_index) = self
            .locate(task_id)
            .ok_or(BoardError::UnknownTask(task_id))?;
        let from = self.columns[from_col].status;
        if from == to {
            return Ok(None);
        }

        let original = self.columns[from_col].tasks.remove(from_index);
        let mut moved = original.clone();
        moved.status = to;
        self.insert_sorted(moved);

        Ok(Some(PendingMove {
            task_id,
            from,
            to,
            from_index,
            original,
        }))
    }

    /// Confirms a move with the record the server returned.
    pub fn commit(&mut self, pending: PendingMove, confirmed: Task) -> Result<(), BoardError> {
        let index = self
            .position_in(pending.to, pending.task_id)
            .ok_or(BoardError::StaleMove(pending.task_id))?;
        self.columns[column_index(pending.to)].tasks.remove(index);
        self.insert_sorted(confirmed);
        Ok(())
    }

    /// Undoes a move whose server call failed.
    pub fn rollback(&mut self, pending: PendingMove) -> Result<(), BoardError> {
        let index = self
            .position_in(pending.to, pending.task_id)
            .ok_or(BoardError::StaleMove(pending.task_id))?;
        self.columns[column_index(pending.to)].tasks.remove(index);

        let source = &mut self.columns[column_index(pending.from)].tasks;
        let at = pending.from_index.min(source.len());
        source.insert(at, pending.original);
        Ok(())
    }

    fn locate(&self, task_id: TaskId) -> Option<(usize, usize)> {
        self.columns.iter().enumerate().find_map(|(col, column)| {
            column
                .tasks
                .iter()
                .position(|task| task.id == task_id)
                .map(|index| (col, index))
        })
    }

    fn position_in(&self, status: TaskStatus, task_id: TaskId) -> Option<usize> {
        self.columns[column_index(status)]
            .tasks
            .iter()
            .position(|task| task.id == task_id)
    }

    fn insert_sorted(&mut self, task: Task) {
        let tasks = &mut self.columns[column_index(task.status)].tasks;
        let at = tasks
            .iter()
            .position(|existing| existing.created_at < task.created_at)
            .unwrap_or(tasks.len());
        tasks.insert(at, task);
    }
}

fn column_index(status: TaskStatus) -> usize {
    match status {
        TaskStatus::Todo => 0,
        TaskStatus::InProgress => 1,
        TaskStatus::Done => 2,
    }
}
