//! Project use-case service.
//!
//! # Invariants
//! - Create validates the name before touching the repository.
//! - Deleting a project never touches its tasks.

use super::{RecordKind, ServiceError, ServiceResult};
use crate::model::project::{NewProject, Project, ProjectId};
use crate::model::user::UserId;
use crate::repo::project_repo::ProjectRepository;
use log::info;

pub struct ProjectService<R: ProjectRepository> {
    repo: R,
}

impl<R: ProjectRepository> ProjectService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a project owned by `owner` and returns the stored record.
    pub fn create_project(
        &self,
        payload: &NewProject,
        owner: Option<UserId>,
    ) -> ServiceResult<Project> {
        let project = payload.validate(owner)?;
        let id = self.repo.create_project(&project)?;
        info!("event=project_create module=service status=ok project_id={id}");

        self.repo
            .get_project(id)?
            .ok_or(ServiceError::InconsistentState(
                "created project not found in read-back",
            ))
    }

    pub fn get_project(&self, id: ProjectId) -> ServiceResult<Project> {
        self.repo.get_project(id)?.ok_or(ServiceError::NotFound {
            kind: RecordKind::Project,
            id,
        })
    }

    /// Lists all projects, newest first.
    pub fn list_projects(&self) -> ServiceResult<Vec<Project>> {
        Ok(self.repo.list_projects()?)
    }

    /// Deletes a project and returns what was removed.
    pub fn delete_project(&self, id: ProjectId) -> ServiceResult<Project> {
        let deleted = self
            .repo
            .delete_project(id)
            .map_err(|err| ServiceError::from_repo(RecordKind::Project, err))?;
        info!("event=project_delete module=service status=ok project_id={id}");
        Ok(deleted)
    }
}
