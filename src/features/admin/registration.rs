use serde_json::Value;

use crate::features::admin::site::{AdminError, AdminForm, AdminModel, AdminSite, ModelAdmin};
use crate::features::categories::dtos::CategoryPayloadDto;
use crate::features::categories::models::Category;
use crate::features::posts::models::Post;

pub const APP_LABEL: &str = "blog";

impl AdminModel for Category {
    const APP_LABEL: &'static str = APP_LABEL;
    const MODEL_NAME: &'static str = "category";
    const FIELDS: &'static [&'static str] = &["name", "slug", "description", "created_at"];

    fn pk(&self) -> i64 {
        self.id
    }

    fn display_value(&self, field: &str) -> Option<Value> {
        match field {
            "name" => Some(Value::from(self.name.as_str())),
            "slug" => Some(Value::from(self.slug.as_str())),
            "description" => Some(self.description.as_deref().map_or(Value::Null, Value::from)),
            "created_at" => Some(Value::from(self.created_at.to_rfc3339())),
            _ => None,
        }
    }
}

impl AdminModel for Post {
    const APP_LABEL: &'static str = APP_LABEL;
    const MODEL_NAME: &'static str = "post";
    const FIELDS: &'static [&'static str] = &["title", "content", "category", "author", "created_at"];

    fn pk(&self) -> i64 {
        self.id
    }

    fn display_value(&self, field: &str) -> Option<Value> {
        match field {
            "title" => Some(Value::from(self.title.as_str())),
            "content" => Some(Value::from(self.content.as_str())),
            // Related objects are shown by name
            "category" => Some(self.category_name.as_deref().map_or(Value::Null, Value::from)),
            "author" => Some(Value::from(self.author.as_str())),
            "created_at" => Some(Value::from(self.created_at.to_rfc3339())),
            _ => None,
        }
    }
}

impl AdminForm for CategoryPayloadDto {
    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "name" => Some(self.name.clone()),
            "slug" => self.slug.clone(),
            "description" => self.description.clone(),
            _ => None,
        }
    }

    fn set_field_value(&mut self, field: &str, value: String) {
        match field {
            "name" => self.name = value,
            "slug" => self.slug = Some(value),
            "description" => self.description = Some(value),
            _ => {}
        }
    }
}

pub fn category_admin() -> ModelAdmin {
    ModelAdmin {
        list_display: &["name", "slug", "created_at"],
        search_fields: &["name", "description"],
        prepopulated_fields: &[("slug", &["name"])],
        ..Default::default()
    }
}

pub fn post_admin() -> ModelAdmin {
    ModelAdmin {
        list_display: &["title", "category", "author", "created_at"],
        search_fields: &["title", "content"],
        list_filter: &["created_at", "author", "category"],
        ..Default::default()
    }
}

/// Register the blog's models with `site`
pub fn register_blog_models(site: &mut AdminSite) -> Result<(), AdminError> {
    site.register::<Category>(category_admin())?;
    site.register::<Post>(post_admin())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_blog_models_register() {
        let mut site = AdminSite::new();
        register_blog_models(&mut site).unwrap();

        let keys: Vec<String> = site.models().map(|m| m.key()).collect();
        assert_eq!(keys, vec!["blog.category", "blog.post"]);

        let category = site.admin_for::<Category>().unwrap();
        assert_eq!(category.list_display, &["name", "slug", "created_at"]);
        assert_eq!(category.search_fields, &["name", "description"]);
        assert!(category.list_filter.is_empty());
        assert_eq!(category.prepopulated_fields, &[("slug", &["name"][..])]);

        let post = site.admin_for::<Post>().unwrap();
        assert_eq!(post.list_display, &["title", "category", "author", "created_at"]);
        assert_eq!(post.search_fields, &["title", "content"]);
        assert_eq!(post.list_filter, &["created_at", "author", "category"]);
        assert!(post.prepopulated_fields.is_empty());
    }

    #[test]
    fn test_registering_twice_fails() {
        let mut site = AdminSite::new();
        register_blog_models(&mut site).unwrap();
        assert_eq!(
            register_blog_models(&mut site),
            Err(AdminError::AlreadyRegistered("blog.category".to_string()))
        );
    }

    #[test]
    fn test_category_slug_is_prepopulated_from_name() {
        let mut form = CategoryPayloadDto {
            name: "Tech".to_string(),
            slug: None,
            description: None,
        };
        category_admin().apply_prepopulated(&mut form);
        assert_eq!(form.slug.as_deref(), Some("tech"));

        let mut form = CategoryPayloadDto {
            name: "Rust & Systems".to_string(),
            slug: Some("  ".to_string()),
            description: None,
        };
        category_admin().apply_prepopulated(&mut form);
        assert_eq!(form.slug.as_deref(), Some("rust-systems"));
    }

    #[test]
    fn test_post_row_shows_category_name() {
        let post = Post {
            id: 3,
            title: "Hello".to_string(),
            content: "Body".to_string(),
            category_id: Some(1),
            category_name: Some("Tech".to_string()),
            author: "alice".to_string(),
            created_at: Utc::now(),
        };
        let row = post_admin().project_row(&post);

        let mut keys: Vec<&str> = row.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["author", "category", "created_at", "id", "title"]);
        assert_eq!(row["category"], Value::from("Tech"));
        assert_eq!(row["id"], Value::from(3));
    }
}
