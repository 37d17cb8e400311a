use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::admin::dtos::*;
use crate::features::admin::filters::{search_terms, DateFilter};
use crate::features::admin::site::{AdminModel, AdminSite, ModelAdmin};
use crate::features::categories::dtos::{CategoryPayloadDto, CategoryResponseDto};
use crate::features::categories::models::{Category, CategoryData};
use crate::features::categories::CategoryService;
use crate::features::posts::dtos::{PostPayloadDto, PostResponseDto};
use crate::features::posts::models::{Post, PostData};
use crate::features::posts::PostService;
use crate::modules::storage::{CategoryFilter, CategoryListQuery, PostListQuery, SearchQuery};

/// Service behind the admin changelists and change forms
pub struct AdminService {
    site: Arc<AdminSite>,
    categories: Arc<CategoryService>,
    posts: Arc<PostService>,
}

impl AdminService {
    pub fn new(
        site: Arc<AdminSite>,
        categories: Arc<CategoryService>,
        posts: Arc<PostService>,
    ) -> Self {
        Self {
            site,
            categories,
            posts,
        }
    }

    /// Registered models, ordered by key
    pub fn models(&self) -> Vec<AdminModelDto> {
        self.site.models().map(AdminModelDto::from).collect()
    }

    fn admin_for<M: AdminModel>(&self) -> Result<&ModelAdmin> {
        Ok(self.site.admin_for::<M>()?)
    }

    fn search(admin: &ModelAdmin, input: Option<&str>) -> SearchQuery {
        SearchQuery::new(
            input.map(search_terms).unwrap_or_default(),
            admin.search_fields,
        )
    }

    // =========================================================================
    // CATEGORIES
    // =========================================================================

    pub async fn list_categories(&self, params: &CategoryAdminQuery) -> Result<(AdminListDto, i64)> {
        let admin = self.admin_for::<Category>()?;
        let query = CategoryListQuery {
            search: Self::search(admin, params.search.as_deref()),
            offset: params.offset(),
            limit: Some(params.limit()),
        };
        let (categories, total) = self.categories.list(&query).await?;

        Ok((
            AdminListDto {
                columns: owned_columns(admin),
                rows: categories.iter().map(|c| admin.project_row(c)).collect(),
                filters: Vec::new(),
            },
            total,
        ))
    }

    pub async fn get_category(&self, id: i64) -> Result<CategoryResponseDto> {
        Ok(self.categories.get(id).await?.into())
    }

    pub async fn create_category(&self, dto: CategoryPayloadDto) -> Result<CategoryResponseDto> {
        let data = self.category_form(dto)?;
        Ok(self.categories.create(data).await?.into())
    }

    pub async fn update_category(
        &self,
        id: i64,
        dto: CategoryPayloadDto,
    ) -> Result<CategoryResponseDto> {
        let data = self.category_form(dto)?;
        Ok(self.categories.update(id, data).await?.into())
    }

    pub async fn delete_category(&self, id: i64) -> Result<()> {
        self.categories.delete(id).await
    }

    /// Normalize, prepopulate and validate a submitted category
    fn category_form(&self, dto: CategoryPayloadDto) -> Result<CategoryData> {
        let mut dto = dto.normalized();
        self.admin_for::<Category>()?.apply_prepopulated(&mut dto);
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        Ok(dto.into())
    }

    // =========================================================================
    // POSTS
    // =========================================================================

    pub async fn list_posts(&self, params: &PostAdminQuery) -> Result<(AdminListDto, i64)> {
        let admin = self.admin_for::<Post>()?;

        let category = if params.uncategorized.unwrap_or(false) {
            Some(CategoryFilter::Uncategorized)
        } else {
            params.category.map(CategoryFilter::Id)
        };
        let query = PostListQuery {
            search: Self::search(admin, params.search.as_deref()),
            created: params.created_at.map(|f| f.range(Utc::now())),
            author: params.author.clone().filter(|a| !a.is_empty()),
            category,
            offset: params.offset(),
            limit: Some(params.limit()),
        };
        let (posts, total) = self.posts.list(&query).await?;

        Ok((
            AdminListDto {
                columns: owned_columns(admin),
                rows: posts.iter().map(|p| admin.project_row(p)).collect(),
                filters: self.post_filters(admin).await?,
            },
            total,
        ))
    }

    /// Sidebar choices for each `list_filter` field
    async fn post_filters(&self, admin: &ModelAdmin) -> Result<Vec<AdminFilterDto>> {
        let mut filters = Vec::with_capacity(admin.list_filter.len());
        for field in admin.list_filter {
            let choices = match *field {
                "created_at" => DateFilter::ALL
                    .iter()
                    .map(|f| FilterChoiceDto::new("created_at", f.as_str(), f.label()))
                    .collect(),
                "author" => self
                    .posts
                    .authors()
                    .await?
                    .into_iter()
                    .map(|a| FilterChoiceDto::new("author", a.clone(), a))
                    .collect(),
                "category" => {
                    let mut choices: Vec<FilterChoiceDto> = self
                        .categories
                        .list_all()
                        .await?
                        .into_iter()
                        .map(|c| FilterChoiceDto::new("category", c.id.to_string(), c.name))
                        .collect();
                    choices.push(FilterChoiceDto::new("uncategorized", "true", "(None)"));
                    choices
                }
                other => {
                    return Err(AppError::Internal(format!(
                        "No list filter for post field '{}'",
                        other
                    )))
                }
            };
            filters.push(AdminFilterDto {
                field: field.to_string(),
                choices,
            });
        }
        Ok(filters)
    }

    pub async fn get_post(&self, id: i64) -> Result<PostResponseDto> {
        Ok(self.posts.get(id).await?.into())
    }

    pub async fn create_post(&self, dto: PostPayloadDto) -> Result<PostResponseDto> {
        let data = post_form(dto)?;
        Ok(self.posts.create(data).await?.into())
    }

    pub async fn update_post(&self, id: i64, dto: PostPayloadDto) -> Result<PostResponseDto> {
        let data = post_form(dto)?;
        Ok(self.posts.update(id, data).await?.into())
    }

    pub async fn delete_post(&self, id: i64) -> Result<()> {
        self.posts.delete(id).await
    }
}

/// Normalize and validate a submitted post
fn post_form(dto: PostPayloadDto) -> Result<PostData> {
    let dto = dto.normalized();
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(dto.into())
}

fn owned_columns(admin: &ModelAdmin) -> Vec<String> {
    admin.list_display.iter().map(|f| f.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::admin::registration::register_blog_models;
    use crate::modules::storage::{BlogStore, MemoryBlogStore};
    use chrono::Duration;
    use serde_json::Value;

    fn service_with_store() -> (AdminService, Arc<MemoryBlogStore>) {
        let store = Arc::new(MemoryBlogStore::new());
        let mut site = AdminSite::new();
        register_blog_models(&mut site).unwrap();

        let dyn_store: Arc<dyn BlogStore> = store.clone();
        let service = AdminService::new(
            Arc::new(site),
            Arc::new(CategoryService::new(dyn_store.clone())),
            Arc::new(PostService::new(dyn_store)),
        );
        (service, store)
    }

    fn category(name: &str) -> CategoryPayloadDto {
        CategoryPayloadDto {
            name: name.to_string(),
            slug: None,
            description: None,
        }
    }

    fn post(title: &str, author: &str, category_id: Option<i64>) -> PostPayloadDto {
        PostPayloadDto {
            title: title.to_string(),
            content: format!("About {}", title.to_lowercase()),
            category_id,
            author: author.to_string(),
        }
    }

    #[tokio::test]
    async fn test_blank_slug_is_derived_from_name() {
        let (service, _) = service_with_store();
        let tech = service.create_category(category("Tech")).await.unwrap();
        assert_eq!(tech.slug, "tech");

        let mut explicit = category("Rust & Systems");
        explicit.slug = Some("systems".to_string());
        let systems = service.create_category(explicit).await.unwrap();
        assert_eq!(systems.slug, "systems");

        // Renaming with a blank slug derives it again
        let renamed = service
            .update_category(tech.id, category("Technology"))
            .await
            .unwrap();
        assert_eq!(renamed.slug, "technology");
    }

    #[tokio::test]
    async fn test_unsluggable_name_fails_validation() {
        let (service, _) = service_with_store();
        let err = service.create_category(category("!!!")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_category_changelist_search() {
        let (service, _) = service_with_store();
        service.create_category(category("Tech")).await.unwrap();
        let mut travel = category("Travel");
        travel.description = Some("Trips and tech-free weekends".to_string());
        service.create_category(travel).await.unwrap();
        service.create_category(category("Cooking")).await.unwrap();

        let params = CategoryAdminQuery {
            search: Some("tech".to_string()),
            ..Default::default()
        };
        let (list, total) = service.list_categories(&params).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(list.columns, vec!["name", "slug", "created_at"]);
        assert!(list.filters.is_empty());

        // Slug is not a search field
        let params = CategoryAdminQuery {
            search: Some("cooking weekends".to_string()),
            ..Default::default()
        };
        assert_eq!(service.list_categories(&params).await.unwrap().1, 0);
    }

    #[tokio::test]
    async fn test_post_changelist_filters() {
        let (service, store) = service_with_store();
        let tech = service.create_category(category("Tech")).await.unwrap();
        let old = service
            .create_post(post("Rust tips", "alice", Some(tech.id)))
            .await
            .unwrap();
        service.create_post(post("Gardening", "bob", None)).await.unwrap();
        service
            .create_post(post("Rust async", "bob", Some(tech.id)))
            .await
            .unwrap();
        store
            .set_post_created_at(old.id, Utc::now() - Duration::days(400))
            .await;

        let (list, total) = service.list_posts(&PostAdminQuery::default()).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(list.columns, vec!["title", "category", "author", "created_at"]);
        assert_eq!(list.rows[0]["category"], Value::from("Tech"));
        assert_eq!(list.rows[1]["category"], Value::Null);

        let fields: Vec<&str> = list.filters.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["created_at", "author", "category"]);
        assert_eq!(list.filters[1].choices.len(), 2);
        assert!(list.filters[2]
            .choices
            .contains(&FilterChoiceDto::new("uncategorized", "true", "(None)")));

        let this_year = PostAdminQuery {
            search: Some("rust".to_string()),
            created_at: Some(DateFilter::ThisYear),
            ..Default::default()
        };
        let (list, total) = service.list_posts(&this_year).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(list.rows[0]["title"], Value::from("Rust async"));

        let uncategorized = PostAdminQuery {
            uncategorized: Some(true),
            category: Some(tech.id),
            ..Default::default()
        };
        let (list, _) = service.list_posts(&uncategorized).await.unwrap();
        assert_eq!(list.rows.len(), 1);
        assert_eq!(list.rows[0]["title"], Value::from("Gardening"));

        let by_author = PostAdminQuery {
            author: Some("bob".to_string()),
            category: Some(tech.id),
            ..Default::default()
        };
        assert_eq!(service.list_posts(&by_author).await.unwrap().1, 1);
    }

    #[tokio::test]
    async fn test_content_is_searched_but_author_is_not() {
        let (service, _) = service_with_store();
        service.create_post(post("Hello", "zed", None)).await.unwrap();

        let by_content = PostAdminQuery {
            search: Some("ABOUT hello".to_string()),
            ..Default::default()
        };
        assert_eq!(service.list_posts(&by_content).await.unwrap().1, 1);

        let by_author = PostAdminQuery {
            search: Some("zed".to_string()),
            ..Default::default()
        };
        assert_eq!(service.list_posts(&by_author).await.unwrap().1, 0);
    }

    #[tokio::test]
    async fn test_blank_post_fields_fail_validation() {
        let (service, _) = service_with_store();
        let err = service.create_post(post("   ", "alice", None)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = service.create_post(post("Title", "  ", None)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let saved = service
            .create_post(post("  Padded  ", " alice ", None))
            .await
            .unwrap();
        assert_eq!(saved.title, "Padded");
        assert_eq!(saved.author, "alice");

        let err = service
            .update_post(saved.id, post("\t", "alice", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(service.get_post(saved.id).await.unwrap().title, "Padded");
    }

    #[test]
    fn test_models_lists_registry() {
        let (service, _) = service_with_store();
        let models = service.models();
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].key, "blog.category");
        assert_eq!(models[0].url, "/admin/blog/category");
        assert_eq!(models[0].prepopulated_fields[0].field, "slug");
        assert_eq!(models[1].list_filter, vec!["created_at", "author", "category"]);
    }
}
