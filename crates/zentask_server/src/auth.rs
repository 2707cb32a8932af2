//! Bearer-token extractor for protected routes.

use crate::app::AppState;
use crate::error::ApiError;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use log::warn;
use std::sync::Arc;
use zentask_core::{AuthService, SqliteUserRepository, User};

/// The account behind a valid `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            warn!("event=auth_check module=server status=error error_code=missing_token");
            return Err(ApiError::Unauthorized("Not authorized, no token".to_string()));
        };

        let keys = Arc::clone(&state.keys);
        let user = state
            .store
            .call(move |conn| {
                let service = AuthService::new(SqliteUserRepository::new(conn), &keys);
                Ok(service.authenticate(&token)?)
            })
            .await
            .inspect_err(|_| {
                warn!("event=auth_check module=server status=error error_code=invalid_token");
            })?;
        Ok(Self(user))
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}
