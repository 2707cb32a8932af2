//! Board and filtering logic.
//!
//! # Responsibility
//! - Turn raw list parameters into typed filters and page windows.
//! - Group tasks into kanban columns and resolve card moves.
//! - Summarize projects/tasks for the dashboard.
//!
//! Everything here is pure: no storage or network access.

pub mod columns;
pub mod dashboard;
pub mod filter;

pub use columns::{Board, BoardError, Column, PendingMove};
pub use dashboard::{DashboardStats, StatusCounts};
pub use filter::{Pagination, TaskFilter, TaskQueryParams, DEFAULT_LIMIT, DEFAULT_PAGE};
