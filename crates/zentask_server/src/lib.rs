//! HTTP JSON API for Zentask.
//!
//! Handlers stay thin: extract, hand the connection to a core service on the
//! blocking pool, map the result. Business rules live in `zentask_core`.

pub mod app;
pub mod auth;
pub mod error;
pub mod routes;
pub mod store;

pub use app::{build_router, run_server, AppState};
pub use error::ApiError;
pub use store::Store;
