//! EduNexus - school resource portal
//!
//! A catalogue of school resources (documents, links, videos, events)
//! shown to students, parents, parent-association members and teachers,
//! with role-gated visibility, search and filtering, publishing for
//! privileged roles, and an assistant that answers questions about the
//! catalogue through a hosted language model.
//!
//! ## Architecture
//!
//! ```text
//!  HTTP (axum)
//!    │
//!    ├── session    identity, view filters, conversation per viewer
//!    │     └── auth: pluggable credential verification
//!    ├── catalogue  policy → query engine → listing
//!    │              creation workflow → store (prepend)
//!    └── assistant  preamble (catalogue snapshot + role hint)
//!                   → completion client, timeout + retry → reply
//! ```
//!
//! ## Modules
//!
//! - [`catalogue`]: Resources, categories, visibility policy, query engine, creation
//! - [`session`]: Session and role context
//! - [`assistant`]: Assistant bridge and completion backends
//! - [`api`]: Combined HTTP router
//! - [`config`]: Configuration management

pub mod api;
pub mod assistant;
pub mod catalogue;
pub mod config;
pub mod error;
pub mod session;

pub use config::PortalConfig;
pub use error::{Error, Result};
