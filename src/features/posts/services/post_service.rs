use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::posts::models::{Post, PostData};
use crate::modules::storage::{BlogStore, PostListQuery};

/// Service for post operations
pub struct PostService {
    store: Arc<dyn BlogStore>,
}

impl PostService {
    pub fn new(store: Arc<dyn BlogStore>) -> Self {
        Self { store }
    }

    /// List posts matching `query`, with the total match count
    pub async fn list(&self, query: &PostListQuery) -> Result<(Vec<Post>, i64)> {
        self.store.list_posts(query).await
    }

    /// Every post, newest first
    pub async fn list_all(&self) -> Result<Vec<Post>> {
        let (posts, _) = self.store.list_posts(&PostListQuery::default()).await?;
        Ok(posts)
    }

    /// Get post by primary key
    pub async fn get(&self, id: i64) -> Result<Post> {
        self.store
            .get_post(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", id)))
    }

    pub async fn create(&self, data: PostData) -> Result<Post> {
        let post = self.store.create_post(data).await?;
        tracing::info!("Post created: id={}, author={}", post.id, post.author);
        Ok(post)
    }

    pub async fn update(&self, id: i64, data: PostData) -> Result<Post> {
        let post = self
            .store
            .update_post(id, data)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", id)))?;
        tracing::info!("Post updated: id={}", post.id);
        Ok(post)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.store.delete_post(id).await? {
            return Err(AppError::NotFound(format!("Post {} not found", id)));
        }
        tracing::info!("Post deleted: id={}", id);
        Ok(())
    }

    /// Distinct authors, for the admin filter sidebar
    pub async fn authors(&self) -> Result<Vec<String>> {
        self.store.list_post_authors().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::storage::MemoryBlogStore;

    #[tokio::test]
    async fn test_missing_post_is_not_found() {
        let service = PostService::new(Arc::new(MemoryBlogStore::new()));
        assert!(matches!(service.get(1).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.delete(1).await, Err(AppError::NotFound(_))));
    }
}
