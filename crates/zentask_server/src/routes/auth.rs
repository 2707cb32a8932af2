//! `/api/auth`: signup, login and the stateless logout.

use crate::app::AppState;
use crate::error::ApiError;
use crate::store::run_blocking;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use zentask_core::{AuthService, AuthSession, LoginRequest, SignupRequest, SqliteUserRepository};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

/// Validation and the duplicate check run under the store lock; argon2 does not.
async fn signup(
    State(state): State<AppState>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthSession>), ApiError> {
    let Json(request) = body?;
    let keys = Arc::clone(&state.keys);
    let pending = state
        .store
        .call(move |conn| {
            let service = AuthService::new(SqliteUserRepository::new(conn), &keys);
            Ok(service.prepare_signup(&request)?)
        })
        .await?;
    let hashed = run_blocking(move || Ok(pending.hash()?)).await?;
    let keys = Arc::clone(&state.keys);
    let session = state
        .store
        .call(move |conn| {
            let service = AuthService::new(SqliteUserRepository::new(conn), &keys);
            Ok(service.complete_signup(hashed)?)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthSession>, ApiError> {
    let Json(request) = body?;
    let keys = Arc::clone(&state.keys);
    let pending = state
        .store
        .call(move |conn| {
            let service = AuthService::new(SqliteUserRepository::new(conn), &keys);
            Ok(service.prepare_login(&request)?)
        })
        .await?;
    let keys = Arc::clone(&state.keys);
    let session = run_blocking(move || Ok(pending.finish(&keys)?)).await?;
    Ok(Json(session))
}

/// Tokens are stateless; the client drops its copy.
async fn logout() -> Json<Value> {
    Json(json!({ "message": "Logged out successfully" }))
}
