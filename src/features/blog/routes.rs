use axum::{routing::get, Router};

use crate::features::blog::handlers::{self, BlogState};
use crate::features::blog::urls::BlogView;

/// Create the public routes from the blog's URL table
pub fn routes(state: BlogState) -> Router {
    let mut router = Router::new();
    for (pattern, path) in state.urls.routes() {
        router = match pattern.view {
            BlogView::Home => router.route(&path, get(handlers::home)),
            BlogView::PostDetail => router.route(&path, get(handlers::post_detail)),
        };
    }

    router.fallback(handlers::fallback).with_state(state)
}
