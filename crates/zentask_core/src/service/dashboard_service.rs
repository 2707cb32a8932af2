//! Dashboard summary use-case.

use super::ServiceResult;
use crate::board::dashboard::DashboardStats;
use crate::repo::project_repo::ProjectRepository;
use crate::repo::task_repo::{TaskListQuery, TaskRepository};
use chrono::{DateTime, Utc};

pub struct DashboardService<P: ProjectRepository, T: TaskRepository> {
    projects: P,
    tasks: T,
}

impl<P: ProjectRepository, T: TaskRepository> DashboardService<P, T> {
    pub fn new(projects: P, tasks: T) -> Self {
        Self { projects, tasks }
    }

    /// Summarizes every project and task as of `now`.
    pub fn summary(&self, now: DateTime<Utc>) -> ServiceResult<DashboardStats> {
        let projects = self.projects.list_projects()?;
        let tasks = self.tasks.list_tasks(&TaskListQuery::default())?;
        Ok(DashboardStats::compute(&projects, &tasks, now))
    }
}
