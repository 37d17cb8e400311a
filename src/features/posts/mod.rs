//! Blog posts.
//!
//! Posts are rendered by the `blog` views and managed through the admin API.

pub mod dtos;
pub mod models;
pub mod services;

pub use services::PostService;
