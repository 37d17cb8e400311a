use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::admin::dtos::*;
use crate::features::admin::services::AdminService;
use crate::features::categories::dtos::{CategoryPayloadDto, CategoryResponseDto};
use crate::features::posts::dtos::{PostPayloadDto, PostResponseDto};
use crate::shared::types::{ApiResponse, Meta};

/// List registered models and their admin options
#[utoipa::path(
    get,
    path = "/admin",
    responses(
        (status = 200, description = "Registered models", body = ApiResponse<Vec<AdminModelDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin",
    security(
        ("basic_auth" = [])
    )
)]
pub async fn index(
    State(service): State<Arc<AdminService>>,
) -> Result<Json<ApiResponse<Vec<AdminModelDto>>>> {
    let models = service.models();
    let total = models.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(models),
        None,
        Some(Meta { total }),
    )))
}

// =============================================================================
// CATEGORIES
// =============================================================================

/// Category changelist
#[utoipa::path(
    get,
    path = "/admin/blog/category",
    params(CategoryAdminQuery),
    responses(
        (status = 200, description = "Page of categories", body = ApiResponse<AdminListDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin",
    security(
        ("basic_auth" = [])
    )
)]
pub async fn list_categories(
    State(service): State<Arc<AdminService>>,
    Query(params): Query<CategoryAdminQuery>,
) -> Result<Json<ApiResponse<AdminListDto>>> {
    let (list, total) = service.list_categories(&params).await?;
    Ok(Json(ApiResponse::success(
        Some(list),
        None,
        Some(Meta { total }),
    )))
}

/// Create a category, deriving a blank slug from its name
#[utoipa::path(
    post,
    path = "/admin/blog/category",
    request_body = CategoryPayloadDto,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Slug already in use")
    ),
    tag = "admin",
    security(
        ("basic_auth" = [])
    )
)]
pub async fn create_category(
    State(service): State<Arc<AdminService>>,
    AppJson(dto): AppJson<CategoryPayloadDto>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponseDto>>)> {
    let category = service.create_category(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(category),
            Some("Category created".to_string()),
            None,
        )),
    ))
}

/// Get a category
#[utoipa::path(
    get,
    path = "/admin/blog/category/{id}",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category", body = ApiResponse<CategoryResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Category not found")
    ),
    tag = "admin",
    security(
        ("basic_auth" = [])
    )
)]
pub async fn get_category(
    State(service): State<Arc<AdminService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.get_category(id).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Replace a category
#[utoipa::path(
    put,
    path = "/admin/blog/category/{id}",
    params(("id" = i64, Path, description = "Category id")),
    request_body = CategoryPayloadDto,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Slug already in use")
    ),
    tag = "admin",
    security(
        ("basic_auth" = [])
    )
)]
pub async fn update_category(
    State(service): State<Arc<AdminService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<CategoryPayloadDto>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.update_category(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(category),
        Some("Category updated".to_string()),
        None,
    )))
}

/// Delete a category; its posts become uncategorized
#[utoipa::path(
    delete,
    path = "/admin/blog/category/{id}",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Category not found")
    ),
    tag = "admin",
    security(
        ("basic_auth" = [])
    )
)]
pub async fn delete_category(
    State(service): State<Arc<AdminService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete_category(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Category deleted".to_string()),
        None,
    )))
}

// =============================================================================
// POSTS
// =============================================================================

/// Post changelist with search and sidebar filters
#[utoipa::path(
    get,
    path = "/admin/blog/post",
    params(PostAdminQuery),
    responses(
        (status = 200, description = "Page of posts", body = ApiResponse<AdminListDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin",
    security(
        ("basic_auth" = [])
    )
)]
pub async fn list_posts(
    State(service): State<Arc<AdminService>>,
    Query(params): Query<PostAdminQuery>,
) -> Result<Json<ApiResponse<AdminListDto>>> {
    let (list, total) = service.list_posts(&params).await?;
    Ok(Json(ApiResponse::success(
        Some(list),
        None,
        Some(Meta { total }),
    )))
}

/// Create a post
#[utoipa::path(
    post,
    path = "/admin/blog/post",
    request_body = PostPayloadDto,
    responses(
        (status = 201, description = "Post created", body = ApiResponse<PostResponseDto>),
        (status = 400, description = "Validation error or unknown category"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin",
    security(
        ("basic_auth" = [])
    )
)]
pub async fn create_post(
    State(service): State<Arc<AdminService>>,
    AppJson(dto): AppJson<PostPayloadDto>,
) -> Result<(StatusCode, Json<ApiResponse<PostResponseDto>>)> {
    let post = service.create_post(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(post),
            Some("Post created".to_string()),
            None,
        )),
    ))
}

/// Get a post
#[utoipa::path(
    get,
    path = "/admin/blog/post/{id}",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post", body = ApiResponse<PostResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found")
    ),
    tag = "admin",
    security(
        ("basic_auth" = [])
    )
)]
pub async fn get_post(
    State(service): State<Arc<AdminService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<PostResponseDto>>> {
    let post = service.get_post(id).await?;
    Ok(Json(ApiResponse::success(Some(post), None, None)))
}

/// Replace a post
#[utoipa::path(
    put,
    path = "/admin/blog/post/{id}",
    params(("id" = i64, Path, description = "Post id")),
    request_body = PostPayloadDto,
    responses(
        (status = 200, description = "Post updated", body = ApiResponse<PostResponseDto>),
        (status = 400, description = "Validation error or unknown category"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found")
    ),
    tag = "admin",
    security(
        ("basic_auth" = [])
    )
)]
pub async fn update_post(
    State(service): State<Arc<AdminService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<PostPayloadDto>,
) -> Result<Json<ApiResponse<PostResponseDto>>> {
    let post = service.update_post(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(post),
        Some("Post updated".to_string()),
        None,
    )))
}

/// Delete a post
#[utoipa::path(
    delete,
    path = "/admin/blog/post/{id}",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found")
    ),
    tag = "admin",
    security(
        ("basic_auth" = [])
    )
)]
pub async fn delete_post(
    State(service): State<Arc<AdminService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete_post(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Post deleted".to_string()),
        None,
    )))
}
