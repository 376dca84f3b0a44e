//! Web layer for the liveboard.
//!
//! Serves the liveboard and train detail pages as HTML, or as JSON when the
//! client does not ask for HTML.

mod dto;
mod routes;
mod state;
pub mod templates;

#[cfg(test)]
mod routes_tests;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
