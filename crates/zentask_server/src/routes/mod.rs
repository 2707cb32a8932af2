//! Route handlers grouped by resource.

pub mod auth;
pub mod dashboard;
pub mod projects;
pub mod tasks;

use axum::Json;
use serde_json::{json, Value};

/// Liveness check.
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Backend is running!",
        "version": zentask_core::core_version(),
    }))
}
