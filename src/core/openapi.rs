use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::admin::{dtos as admin_dtos, filters as admin_filters, handlers as admin_handlers};
use crate::features::categories::dtos as categories_dtos;
use crate::features::posts::dtos as posts_dtos;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Admin
        admin_handlers::index,
        admin_handlers::list_categories,
        admin_handlers::create_category,
        admin_handlers::get_category,
        admin_handlers::update_category,
        admin_handlers::delete_category,
        admin_handlers::list_posts,
        admin_handlers::create_post,
        admin_handlers::get_post,
        admin_handlers::update_post,
        admin_handlers::delete_post,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Categories
            categories_dtos::CategoryPayloadDto,
            categories_dtos::CategoryResponseDto,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            // Posts
            posts_dtos::PostPayloadDto,
            posts_dtos::PostResponseDto,
            ApiResponse<posts_dtos::PostResponseDto>,
            // Admin
            admin_filters::DateFilter,
            admin_dtos::AdminModelDto,
            admin_dtos::PrepopulatedFieldDto,
            admin_dtos::AdminListDto,
            admin_dtos::AdminFilterDto,
            admin_dtos::FilterChoiceDto,
            ApiResponse<Vec<admin_dtos::AdminModelDto>>,
            ApiResponse<admin_dtos::AdminListDto>,
        )
    ),
    tags(
        (name = "admin", description = "Blog administration (HTTP Basic auth)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Blog API",
        version = "0.1.0",
        description = "Admin API documentation for the blog",
    )
)]
pub struct ApiDoc;

/// Adds the HTTP Basic security scheme used by the admin
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Basic).build()),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
