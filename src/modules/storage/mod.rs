//! Storage module for blog content
//!
//! Provides the `BlogStore` abstraction over categories and posts with a
//! PostgreSQL implementation and a process-local in-memory implementation.

mod memory;
mod postgres;

pub use memory::MemoryBlogStore;
pub use postgres::PgBlogStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::error::Result;
use crate::features::categories::models::{Category, CategoryData};
use crate::features::posts::models::{Post, PostData};

/// Text view of a record used for case-insensitive search
pub trait Searchable {
    /// Text of `field`, `None` when the field is unknown or null
    fn search_text(&self, field: &str) -> Option<&str>;
}

/// Every term must occur in at least one of the fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub terms: Vec<String>,
    pub fields: &'static [&'static str],
}

impl SearchQuery {
    pub fn new(terms: Vec<String>, fields: &'static [&'static str]) -> Self {
        Self { terms, fields }
    }

    /// No terms or nothing to search in: matches everything
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() || self.fields.is_empty()
    }

    pub fn matches<T: Searchable>(&self, item: &T) -> bool {
        if self.is_empty() {
            return true;
        }
        self.terms.iter().all(|term| {
            let needle = term.to_lowercase();
            self.fields.iter().any(|field| {
                item.search_text(field)
                    .is_some_and(|text| text.to_lowercase().contains(&needle))
            })
        })
    }
}

/// Half-open timestamp range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    Id(i64),
    Uncategorized,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryListQuery {
    pub search: SearchQuery,
    pub offset: i64,
    /// `None` returns every remaining row
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct PostListQuery {
    pub search: SearchQuery,
    pub created: Option<DateRange>,
    pub author: Option<String>,
    pub category: Option<CategoryFilter>,
    pub offset: i64,
    /// `None` returns every remaining row
    pub limit: Option<i64>,
}

/// Persistence for categories and posts.
///
/// Lists are ordered newest first (`created_at DESC, id DESC`) and return the
/// page together with the total number of matching rows.
#[async_trait]
pub trait BlogStore: Send + Sync {
    async fn list_categories(&self, query: &CategoryListQuery) -> Result<(Vec<Category>, i64)>;

    async fn get_category(&self, id: i64) -> Result<Option<Category>>;

    /// Fails with `Conflict` when the slug is taken
    async fn create_category(&self, data: CategoryData) -> Result<Category>;

    /// `None` when no category has `id`
    async fn update_category(&self, id: i64, data: CategoryData) -> Result<Option<Category>>;

    /// Posts of a deleted category become uncategorized
    async fn delete_category(&self, id: i64) -> Result<bool>;

    async fn list_posts(&self, query: &PostListQuery) -> Result<(Vec<Post>, i64)>;

    async fn get_post(&self, id: i64) -> Result<Option<Post>>;

    /// Fails with `BadRequest` when the category does not exist
    async fn create_post(&self, data: PostData) -> Result<Post>;

    async fn update_post(&self, id: i64, data: PostData) -> Result<Option<Post>>;

    async fn delete_post(&self, id: i64) -> Result<bool>;

    /// Distinct post authors, sorted
    async fn list_post_authors(&self) -> Result<Vec<String>>;
}
