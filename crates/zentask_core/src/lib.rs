//! Core domain logic for Zentask.
//! This crate is the single source of truth for business invariants.

pub mod board;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use board::{Board, BoardError, DashboardStats, Pagination, PendingMove, TaskFilter, TaskQueryParams};
pub use config::{AppConfig, ConfigError, Environment};
pub use db::{DatabaseTarget, DbError};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::project::{NewProject, Project, ProjectId};
pub use model::task::{NewTask, Task, TaskId, TaskPatch, TaskPriority, TaskStatus};
pub use model::user::{User, UserId};
pub use model::ValidationError;
pub use repo::project_repo::{ProjectRepository, SqliteProjectRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskListQuery, TaskRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::auth_service::{
    AuthError, AuthService, AuthSession, HashedSignup, LoginRequest, PendingLogin, PendingSignup,
    SignupRequest, TokenKeys,
};
pub use service::dashboard_service::DashboardService;
pub use service::project_service::ProjectService;
pub use service::task_service::TaskService;
pub use service::{RecordKind, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
