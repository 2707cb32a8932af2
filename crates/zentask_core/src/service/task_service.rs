//! Task use-case service.
//!
//! # Responsibility
//! - Validate create/update payloads before persistence.
//! - Serve filtered, paginated task lists and board views.
//! - Apply status transitions issued by board moves.
//!
//! # Invariants
//! - A missing title or project reference never reaches the repository.
//! - Status transitions are unrestricted: any status may follow any other.

use super::{RecordKind, ServiceError, ServiceResult};
use crate::board::columns::Board;
use crate::board::filter::{Pagination, TaskFilter};
use crate::model::project::ProjectId;
use crate::model::task::{NewTask, Task, TaskId, TaskPatch, TaskStatus};
use crate::repo::task_repo::{TaskListQuery, TaskRepository};
use log::info;

pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and stores a new task, returning the stored record.
    pub fn create_task(&self, payload: &NewTask) -> ServiceResult<Task> {
        let task = payload.validate()?;
        let id = self.repo.create_task(&task)?;
        info!(
            "event=task_create module=service status=ok task_id={} project_id={}",
            id, task.project_id
        );

        self.repo
            .get_task(id)?
            .ok_or(ServiceError::InconsistentState(
                "created task not found in read-back",
            ))
    }

    pub fn get_task(&self, id: TaskId) -> ServiceResult<Task> {
        self.repo.get_task(id)?.ok_or(ServiceError::NotFound {
            kind: RecordKind::Task,
            id,
        })
    }

    /// Lists one project's tasks, newest first, filtered and windowed.
    pub fn list_project_tasks(
        &self,
        project_id: ProjectId,
        filter: &TaskFilter,
        window: Pagination,
    ) -> ServiceResult<Vec<Task>> {
        let query = TaskListQuery {
            project_id: Some(project_id),
            filter: filter.clone(),
            window: Some(window),
        };
        Ok(self.repo.list_tasks(&query)?)
    }

    /// Lists tasks across every project, newest first, filtered and windowed.
    pub fn list_all_tasks(&self, filter: &TaskFilter, window: Pagination) -> ServiceResult<Vec<Task>> {
        let query = TaskListQuery {
            project_id: None,
            filter: filter.clone(),
            window: Some(window),
        };
        Ok(self.repo.list_tasks(&query)?)
    }

    /// Builds the kanban board for one project from every matching task.
    pub fn project_board(&self, project_id: ProjectId, filter: &TaskFilter) -> ServiceResult<Board> {
        let query = TaskListQuery {
            project_id: Some(project_id),
            filter: filter.clone(),
            window: None,
        };
        Ok(Board::from_tasks(self.repo.list_tasks(&query)?))
    }

    /// Applies a partial update and returns the stored result.
    pub fn update_task(&self, id: TaskId, patch: &TaskPatch) -> ServiceResult<Task> {
        let mut task = self.get_task(id)?;
        let previous_status = task.status;
        patch.apply_to(&mut task)?;
        self.repo
            .update_task(&task)
            .map_err(|err| ServiceError::from_repo(RecordKind::Task, err))?;

        if previous_status != task.status {
            info!(
                "event=task_transition module=service status=ok task_id={} from={} to={}",
                id, previous_status, task.status
            );
        }

        self.repo
            .get_task(id)?
            .ok_or(ServiceError::InconsistentState(
                "updated task not found in read-back",
            ))
    }

    /// Moves a task to another board column.
    pub fn move_task(&self, id: TaskId, status: TaskStatus) -> ServiceResult<Task> {
        self.update_task(id, &TaskPatch::status(status))
    }

    /// Hard-deletes a task. Deleting twice reports `NotFound` the second time.
    pub fn delete_task(&self, id: TaskId) -> ServiceResult<()> {
        self.repo
            .delete_task(id)
            .map_err(|err| ServiceError::from_repo(RecordKind::Task, err))?;
        info!("event=task_delete module=service status=ok task_id={id}");
        Ok(())
    }
}
