//! Post categories.
//!
//! Categories are managed through the admin API; they have no public
//! endpoints of their own.

pub mod dtos;
pub mod models;
pub mod services;

pub use services::CategoryService;
