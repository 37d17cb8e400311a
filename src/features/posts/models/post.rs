use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::modules::storage::Searchable;

/// Database model for post, joined with its category's name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// Writable columns of a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostData {
    pub title: String,
    pub content: String,
    pub category_id: Option<i64>,
    pub author: String,
}

impl Searchable for Post {
    fn search_text(&self, field: &str) -> Option<&str> {
        match field {
            "title" => Some(&self.title),
            "content" => Some(&self.content),
            "author" => Some(&self.author),
            "category" => self.category_name.as_deref(),
            _ => None,
        }
    }
}
