//! Resource catalogue
//!
//! Categories, resources, the visibility policy, the query engine and the
//! creation workflow, plus the HTTP routes that expose them per session.

pub mod create;
pub mod handler;
pub mod policy;
pub mod query;
pub mod seed;
pub mod store;
pub mod types;

pub use handler::{catalogue_router, CatalogueState};
pub use store::CatalogueStore;
