use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::{Category, CategoryData};
use crate::modules::storage::{BlogStore, CategoryListQuery};

/// Service for category operations
pub struct CategoryService {
    store: Arc<dyn BlogStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn BlogStore>) -> Self {
        Self { store }
    }

    /// List categories matching `query`, with the total match count
    pub async fn list(&self, query: &CategoryListQuery) -> Result<(Vec<Category>, i64)> {
        self.store.list_categories(query).await
    }

    /// Every category, newest first
    pub async fn list_all(&self) -> Result<Vec<Category>> {
        let (categories, _) = self
            .store
            .list_categories(&CategoryListQuery::default())
            .await?;
        Ok(categories)
    }

    /// Get category by id
    pub async fn get(&self, id: i64) -> Result<Category> {
        self.store
            .get_category(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }

    pub async fn create(&self, data: CategoryData) -> Result<Category> {
        let category = self.store.create_category(data).await?;
        tracing::info!(
            "Category created: id={}, slug={}",
            category.id,
            category.slug
        );
        Ok(category)
    }

    pub async fn update(&self, id: i64, data: CategoryData) -> Result<Category> {
        let category = self
            .store
            .update_category(id, data)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))?;
        tracing::info!("Category updated: id={}", category.id);
        Ok(category)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.store.delete_category(id).await? {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }
        tracing::info!("Category deleted: id={}", id);
        Ok(())
    }
}
