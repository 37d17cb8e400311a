use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::{Category, CategoryData};
use crate::features::posts::models::{Post, PostData};
use crate::modules::storage::{BlogStore, CategoryFilter, CategoryListQuery, PostListQuery};

#[derive(Debug, Clone)]
struct StoredPost {
    id: i64,
    title: String,
    content: String,
    category_id: Option<i64>,
    author: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct MemoryState {
    categories: Vec<Category>,
    posts: Vec<StoredPost>,
    last_category_id: i64,
    last_post_id: i64,
}

impl MemoryState {
    fn slug_taken(&self, slug: &str, except: Option<i64>) -> bool {
        self.categories
            .iter()
            .any(|c| c.slug == slug && Some(c.id) != except)
    }

    fn check_category_ref(&self, category_id: Option<i64>) -> Result<()> {
        match category_id {
            Some(id) if !self.categories.iter().any(|c| c.id == id) => Err(AppError::BadRequest(
                "Selected category does not exist".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn joined(&self, post: &StoredPost) -> Post {
        let category_name = post.category_id.and_then(|id| {
            self.categories
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.name.clone())
        });
        Post {
            id: post.id,
            title: post.title.clone(),
            content: post.content.clone(),
            category_id: post.category_id,
            category_name,
            author: post.author.clone(),
            created_at: post.created_at,
        }
    }
}

fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, i64)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

fn window<T>(items: Vec<T>, offset: i64, limit: Option<i64>) -> Vec<T> {
    let skipped = items.into_iter().skip(offset.max(0) as usize);
    match limit {
        Some(limit) => skipped.take(limit.max(0) as usize).collect(),
        None => skipped.collect(),
    }
}

/// Process-local store guarded by a `RwLock`, used for development and tests
#[derive(Debug, Default)]
pub struct MemoryBlogStore {
    state: RwLock<MemoryState>,
}

impl MemoryBlogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a post's creation time
    #[cfg(test)]
    pub async fn set_post_created_at(&self, id: i64, created_at: DateTime<Utc>) {
        let mut state = self.state.write().await;
        if let Some(post) = state.posts.iter_mut().find(|p| p.id == id) {
            post.created_at = created_at;
        }
    }
}

#[async_trait]
impl BlogStore for MemoryBlogStore {
    async fn list_categories(&self, query: &CategoryListQuery) -> Result<(Vec<Category>, i64)> {
        let state = self.state.read().await;
        let mut matching: Vec<Category> = state
            .categories
            .iter()
            .filter(|c| query.search.matches(*c))
            .cloned()
            .collect();
        newest_first(&mut matching, |c| (c.created_at, c.id));

        let total = matching.len() as i64;
        Ok((window(matching, query.offset, query.limit), total))
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>> {
        let state = self.state.read().await;
        Ok(state.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn create_category(&self, data: CategoryData) -> Result<Category> {
        let mut state = self.state.write().await;
        if state.slug_taken(&data.slug, None) {
            return Err(AppError::Conflict(
                "Category with this slug already exists".to_string(),
            ));
        }

        state.last_category_id += 1;
        let category = Category {
            id: state.last_category_id,
            name: data.name,
            slug: data.slug,
            description: data.description,
            created_at: Utc::now(),
        };
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(&self, id: i64, data: CategoryData) -> Result<Option<Category>> {
        let mut state = self.state.write().await;
        if !state.categories.iter().any(|c| c.id == id) {
            return Ok(None);
        }
        if state.slug_taken(&data.slug, Some(id)) {
            return Err(AppError::Conflict(
                "Category with this slug already exists".to_string(),
            ));
        }

        Ok(state.categories.iter_mut().find(|c| c.id == id).map(|c| {
            c.name = data.name;
            c.slug = data.slug;
            c.description = data.description;
            c.clone()
        }))
    }

    async fn delete_category(&self, id: i64) -> Result<bool> {
        let mut state = self.state.write().await;
        let before = state.categories.len();
        state.categories.retain(|c| c.id != id);
        if state.categories.len() == before {
            return Ok(false);
        }

        for post in state.posts.iter_mut() {
            if post.category_id == Some(id) {
                post.category_id = None;
            }
        }
        Ok(true)
    }

    async fn list_posts(&self, query: &PostListQuery) -> Result<(Vec<Post>, i64)> {
        let state = self.state.read().await;
        let mut matching: Vec<Post> = state
            .posts
            .iter()
            .map(|p| state.joined(p))
            .filter(|p| query.search.matches(p))
            .filter(|p| query.created.map_or(true, |range| range.contains(p.created_at)))
            .filter(|p| query.author.as_ref().map_or(true, |a| &p.author == a))
            .filter(|p| match query.category {
                Some(CategoryFilter::Id(id)) => p.category_id == Some(id),
                Some(CategoryFilter::Uncategorized) => p.category_id.is_none(),
                None => true,
            })
            .collect();
        newest_first(&mut matching, |p| (p.created_at, p.id));

        let total = matching.len() as i64;
        Ok((window(matching, query.offset, query.limit), total))
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>> {
        let state = self.state.read().await;
        Ok(state
            .posts
            .iter()
            .find(|p| p.id == id)
            .map(|p| state.joined(p)))
    }

    async fn create_post(&self, data: PostData) -> Result<Post> {
        let mut state = self.state.write().await;
        state.check_category_ref(data.category_id)?;

        state.last_post_id += 1;
        let post = StoredPost {
            id: state.last_post_id,
            title: data.title,
            content: data.content,
            category_id: data.category_id,
            author: data.author,
            created_at: Utc::now(),
        };
        let joined = state.joined(&post);
        state.posts.push(post);
        Ok(joined)
    }

    async fn update_post(&self, id: i64, data: PostData) -> Result<Option<Post>> {
        let mut state = self.state.write().await;
        if !state.posts.iter().any(|p| p.id == id) {
            return Ok(None);
        }
        state.check_category_ref(data.category_id)?;

        let Some(post) = state.posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        post.title = data.title;
        post.content = data.content;
        post.category_id = data.category_id;
        post.author = data.author;
        let post = post.clone();

        Ok(Some(state.joined(&post)))
    }

    async fn delete_post(&self, id: i64) -> Result<bool> {
        let mut state = self.state.write().await;
        let before = state.posts.len();
        state.posts.retain(|p| p.id != id);
        Ok(state.posts.len() != before)
    }

    async fn list_post_authors(&self) -> Result<Vec<String>> {
        let state = self.state.read().await;
        let mut authors: Vec<String> = state.posts.iter().map(|p| p.author.clone()).collect();
        authors.sort();
        authors.dedup();
        Ok(authors)
    }
}
