//! Route store crate: persisted relay routes.
//!
//! ## Modules
//!
//! - [`error`] – Store error types
//! - [`route_file`] – RouteStore (JSON file, rewritten in full on every mutation)

mod error;
mod route_file;

pub use error::StoreError;
pub use route_file::{RouteStore, ToggleOutcome};
