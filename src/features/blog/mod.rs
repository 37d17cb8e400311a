//! Public blog pages.
//!
//! The URL table in [`urls`] drives both the axum routes and the links
//! rendered into the templates.

pub mod handlers;
pub mod routes;
pub mod urls;

pub use handlers::BlogState;
