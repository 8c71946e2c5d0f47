//! Session and role context
//!
//! Tracks who each viewer is (anonymous or authenticated), their current
//! filters and their assistant conversation.

pub mod auth;
pub mod handler;
pub mod manager;
pub mod types;

pub use auth::{AuthRejection, CredentialVerifier, StaticCredentials};
pub use handler::{sessions_router, SessionsState};
pub use manager::{SessionError, SessionManager};
