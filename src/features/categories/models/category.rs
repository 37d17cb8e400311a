use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::modules::storage::Searchable;

/// Database model for category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Writable columns of a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryData {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

impl Searchable for Category {
    fn search_text(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            "slug" => Some(&self.slug),
            "description" => self.description.as_deref(),
            _ => None,
        }
    }
}
