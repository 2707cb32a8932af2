//! Shared SQLite handle for request handlers.
//!
//! # Responsibility
//! - Own the single process-wide connection opened by `zentask_core::db`.
//! - Run every blocking store call on tokio's blocking pool.
//!
//! # Invariants
//! - The connection lock is taken inside `spawn_blocking` and never held
//!   across an `.await`.
//! - CPU-heavy work (password hashing) goes through [`run_blocking`], which
//!   never takes the connection lock.

use crate::error::ApiError;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use zentask_core::db::open_target;
use zentask_core::{DatabaseTarget, DbError};

#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Opens (and migrates) the configured database.
    pub fn open(target: &DatabaseTarget) -> Result<Self, DbError> {
        Ok(Self::from_connection(open_target(target)?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `f` against the connection on the blocking pool.
    pub async fn call<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, ApiError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| ApiError::Internal("store lock poisoned".to_string()))?;
            f(&guard)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("store task failed: {err}")))?
    }
}

/// Runs CPU-bound work on the blocking pool without touching the connection.
pub async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|err| ApiError::Internal(format!("blocking task failed: {err}")))?
}

#[cfg(test)]
mod tests {
    use super::{run_blocking, Store};
    use std::time::Duration;
    use zentask_core::db::open_db_in_memory;
    use zentask_core::{AuthService, SignupRequest, SqliteUserRepository, TokenKeys};

    #[tokio::test]
    async fn password_hashing_runs_while_the_store_is_locked() {
        let store = Store::from_connection(open_db_in_memory().unwrap());
        let keys = TokenKeys::from_secret("test-secret");
        let request = SignupRequest {
            name: Some("Locked".to_string()),
            email: Some("locked@example.com".to_string()),
            password: Some("password123".to_string()),
        };
        let pending = {
            let conn = store.conn.lock().unwrap();
            AuthService::new(SqliteUserRepository::new(&conn), &keys)
                .prepare_signup(&request)
                .unwrap()
        };

        let guard = store.conn.lock().unwrap();
        let hashed = tokio::time::timeout(
            Duration::from_secs(30),
            run_blocking(move || Ok(pending.hash()?)),
        )
        .await
        .expect("hashing waited on the store lock")
        .unwrap();
        drop(guard);

        let session = store
            .call(move |conn| {
                let keys = TokenKeys::from_secret("test-secret");
                let service = AuthService::new(SqliteUserRepository::new(conn), &keys);
                Ok(service.complete_signup(hashed)?)
            })
            .await
            .unwrap();
        assert_eq!(session.user.email, "locked@example.com");
    }
}
