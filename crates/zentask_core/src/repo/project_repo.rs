//! Project repository contract and SQLite implementation.

use super::{timestamp_column, uuid_column, RepoError, RepoResult};
use crate::model::project::{Project, ProjectId};
use crate::model::time::to_epoch_millis;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const PROJECT_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    description,
    owner,
    created_at,
    updated_at
FROM projects";

/// Repository interface for project CRUD operations.
pub trait ProjectRepository {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId>;
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    /// All projects, newest first.
    fn list_projects(&self) -> RepoResult<Vec<Project>>;
    /// Hard-deletes and returns the removed project. Referencing tasks stay.
    fn delete_project(&self, id: ProjectId) -> RepoResult<Project>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId> {
        self.conn.execute(
            "INSERT INTO projects (
                uuid,
                name,
                description,
                owner,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                project.id.to_string(),
                project.name.as_str(),
                project.description.as_deref(),
                project.owner.map(|owner| owner.to_string()),
                to_epoch_millis(project.created_at),
                to_epoch_millis(project.updated_at),
            ],
        )?;

        Ok(project.id)
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_project_row(row)?));
        }

        Ok(None)
    }

    fn list_projects(&self) -> RepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL} ORDER BY created_at DESC, rowid DESC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }

        Ok(projects)
    }

    fn delete_project(&self, id: ProjectId) -> RepoResult<Project> {
        let existing = self.get_project(id)?.ok_or(RepoError::NotFound(id))?;
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(existing)
    }
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let owner = match row.get::<_, Option<String>>("owner")? {
        Some(text) => Some(Uuid::parse_str(&text).map_err(|_| {
            RepoError::InvalidData(format!("invalid uuid value `{text}` in projects.owner"))
        })?),
        None => None,
    };

    Ok(Project {
        id: uuid_column(row, "uuid", "projects")?,
        name: row.get("name")?,
        description: row.get("description")?,
        owner,
        created_at: timestamp_column(row, "created_at", "projects")?,
        updated_at: timestamp_column(row, "updated_at", "projects")?,
    })
}
