//! `/api/dashboard`: project and task summary.

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use zentask_core::{DashboardService, DashboardStats, SqliteProjectRepository, SqliteTaskRepository};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(summary))
}

async fn summary(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<DashboardStats>, ApiError> {
    let stats = state
        .store
        .call(|conn| {
            let service = DashboardService::new(
                SqliteProjectRepository::new(conn),
                SqliteTaskRepository::new(conn),
            );
            Ok(service.summary(Utc::now())?)
        })
        .await?;
    Ok(Json(stats))
}
