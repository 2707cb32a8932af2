//! Terminal client for the Zentask API.
//!
//! The library half holds the typed client, session persistence and text
//! rendering; `main.rs` only parses arguments and wires them together.

pub mod client;
pub mod render;
pub mod session;

pub use client::{ApiClient, ClientError};
pub use session::{default_session_path, Session, DEFAULT_BASE_URL};
