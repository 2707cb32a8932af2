//! `/api/tasks`: task CRUD, filtered listings and the project board.
//!
//! # Invariants
//! - `/{projectId}` and `/project/{projectId}` share one listing handler.
//! - A malformed id on update/delete is reported as not found; a malformed
//!   project id on listings is a bad request.

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use uuid::Uuid;
use zentask_core::{
    Board, NewTask, ProjectId, SqliteTaskRepository, Task, TaskId, TaskPatch, TaskQueryParams,
    TaskService, ValidationError,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_all_tasks).post(create_task))
        .route("/project/{project_id}", get(list_project_tasks))
        .route("/project/{project_id}/board", get(project_board))
        .route(
            "/{id}",
            get(list_project_tasks).put(update_task).delete(delete_task),
        )
}

async fn create_task(
    State(state): State<AppState>,
    _user: AuthUser,
    body: Result<Json<NewTask>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(payload) = body?;
    let task = state
        .store
        .call(move |conn| {
            let service = TaskService::new(SqliteTaskRepository::new(conn));
            Ok(service.create_task(&payload)?)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn list_all_tasks(
    State(state): State<AppState>,
    _user: AuthUser,
    query: Result<Query<TaskQueryParams>, QueryRejection>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let Query(params) = query?;
    let filter = params.filter()?;
    let window = params.pagination();
    let tasks = state
        .store
        .call(move |conn| {
            let service = TaskService::new(SqliteTaskRepository::new(conn));
            Ok(service.list_all_tasks(&filter, window)?)
        })
        .await?;
    Ok(Json(tasks))
}

async fn list_project_tasks(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(project_id): Path<String>,
    query: Result<Query<TaskQueryParams>, QueryRejection>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let project_id = parse_project_id(&project_id)?;
    let Query(params) = query?;
    let filter = params.filter()?;
    let window = params.pagination();
    let tasks = state
        .store
        .call(move |conn| {
            let service = TaskService::new(SqliteTaskRepository::new(conn));
            Ok(service.list_project_tasks(project_id, &filter, window)?)
        })
        .await?;
    Ok(Json(tasks))
}

async fn project_board(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(project_id): Path<String>,
    query: Result<Query<TaskQueryParams>, QueryRejection>,
) -> Result<Json<Board>, ApiError> {
    let project_id = parse_project_id(&project_id)?;
    let Query(params) = query?;
    let filter = params.filter()?;
    let board = state
        .store
        .call(move |conn| {
            let service = TaskService::new(SqliteTaskRepository::new(conn));
            Ok(service.project_board(project_id, &filter)?)
        })
        .await?;
    Ok(Json(board))
}

async fn update_task(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    body: Result<Json<TaskPatch>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_task_id(&id)?;
    let Json(patch) = body?;
    let task = state
        .store
        .call(move |conn| {
            let service = TaskService::new(SqliteTaskRepository::new(conn));
            Ok(service.update_task(id, &patch)?)
        })
        .await?;
    Ok(Json(task))
}

async fn delete_task(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_task_id(&id)?;
    state
        .store
        .call(move |conn| {
            let service = TaskService::new(SqliteTaskRepository::new(conn));
            Ok(service.delete_task(id)?)
        })
        .await?;
    Ok(Json(json!({ "message": "Task deleted successfully" })))
}

fn parse_task_id(raw: &str) -> Result<TaskId, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::NotFound("Task not found".to_string()))
}

fn parse_project_id(raw: &str) -> Result<ProjectId, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        ValidationError::InvalidIdentifier {
            field: "projectId",
            value: raw.to_string(),
        }
        .into()
    })
}
