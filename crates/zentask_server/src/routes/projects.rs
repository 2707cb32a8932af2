//! `/api/projects`: create, list, get and delete.

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;
use zentask_core::{NewProject, Project, ProjectId, ProjectService, SqliteProjectRepository};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route("/{id}", get(get_project).delete(delete_project))
}

async fn create_project(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<NewProject>, JsonRejection>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let Json(payload) = body?;
    let project = state
        .store
        .call(move |conn| {
            let service = ProjectService::new(SqliteProjectRepository::new(conn));
            Ok(service.create_project(&payload, Some(user.id))?)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(project)))
}

async fn list_projects(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<Project>>, ApiError> {
    let projects = state
        .store
        .call(|conn| {
            let service = ProjectService::new(SqliteProjectRepository::new(conn));
            Ok(service.list_projects()?)
        })
        .await?;
    Ok(Json(projects))
}

async fn get_project(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    let id = parse_project_id(&id)?;
    let project = state
        .store
        .call(move |conn| {
            let service = ProjectService::new(SqliteProjectRepository::new(conn));
            Ok(service.get_project(id)?)
        })
        .await?;
    Ok(Json(project))
}

async fn delete_project(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    let id = parse_project_id(&id)?;
    let deleted = state
        .store
        .call(move |conn| {
            let service = ProjectService::new(SqliteProjectRepository::new(conn));
            Ok(service.delete_project(id)?)
        })
        .await?;
    Ok(Json(deleted))
}

fn parse_project_id(raw: &str) -> Result<ProjectId, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::NotFound("Project not found".to_string()))
}
