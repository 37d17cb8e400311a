use std::sync::Arc;

use axum::{http::StatusCode, middleware::from_fn_with_state, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::core::config::Config;
use crate::core::middleware::{self, BasicAuth};
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::admin::{register_blog_models, routes as admin_routes, AdminService, AdminSite};
use crate::features::blog::{routes as blog_routes, urls, BlogState};
use crate::features::categories::CategoryService;
use crate::features::posts::PostService;
use crate::modules::storage::BlogStore;
use crate::shared::constants::{ADMIN_REALM, SWAGGER_REALM};

async fn health_check() -> StatusCode {
    StatusCode::OK
}

fn swagger_routes(config: &Config) -> Router {
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger =
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));

    if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        let auth = Arc::new(BasicAuth::new(credentials, SWAGGER_REALM));
        swagger.route_layer(from_fn_with_state(auth, middleware::basic_auth_middleware))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        swagger
    }
}

/// Assemble the application router on top of `store`
pub fn build_app(config: &Config, store: Arc<dyn BlogStore>) -> anyhow::Result<Router> {
    let category_service = Arc::new(CategoryService::new(Arc::clone(&store)));
    let post_service = Arc::new(PostService::new(Arc::clone(&store)));

    let blog_state = BlogState {
        posts: Arc::clone(&post_service),
        urls: Arc::new(urls::urlconf()?),
    };

    let mut app = Router::new()
        .merge(swagger_routes(config))
        .merge(blog_routes::routes(blog_state))
        .route("/health", get(health_check));

    if let Some(credentials) = config.admin.credentials() {
        let mut site = AdminSite::new();
        register_blog_models(&mut site)?;

        let admin_service = Arc::new(AdminService::new(
            Arc::new(site),
            category_service,
            post_service,
        ));
        let auth = Arc::new(BasicAuth::new(credentials, ADMIN_REALM));
        app = app.merge(admin_routes::routes(admin_service, auth));
        tracing::info!("Admin mounted at /admin");
    } else {
        tracing::warn!("Admin disabled (ADMIN_USERNAME / ADMIN_PASSWORD not set)");
    }

    Ok(app.layer(
        ServiceBuilder::new()
            // Generate X-Request-Id using UUID v7 (or use client-provided one)
            .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(middleware::MakeSpanWithRequestId)
                    .on_request(DefaultOnRequest::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            // Propagate X-Request-Id to response headers
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(middleware::cors_layer(
                config.app.cors_allowed_origins.clone(),
            )),
    ))
}
