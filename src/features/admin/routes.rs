use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use crate::core::middleware::{basic_auth_middleware, BasicAuth};
use crate::features::admin::handlers;
use crate::features::admin::services::AdminService;

/// Create admin routes (all require the admin's Basic credentials)
pub fn routes(admin_service: Arc<AdminService>, auth: Arc<BasicAuth>) -> Router {
    Router::new()
        .route("/admin", get(handlers::index))
        .route(
            "/admin/blog/category",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/admin/blog/category/{id}",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route(
            "/admin/blog/post",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route(
            "/admin/blog/post/{id}",
            get(handlers::get_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .route_layer(middleware::from_fn_with_state(auth, basic_auth_middleware))
        .with_state(admin_service)
}
