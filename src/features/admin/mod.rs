//! Admin interface.
//!
//! Models are registered on an [`AdminSite`](site::AdminSite) with a
//! declarative [`ModelAdmin`](site::ModelAdmin); the JSON API under `/admin`
//! serves changelists, filters and change forms for the registered models.

pub mod dtos;
pub mod filters;
pub mod handlers;
pub mod registration;
pub mod routes;
pub mod services;
pub mod site;

pub use registration::register_blog_models;
pub use services::AdminService;
pub use site::AdminSite;
