use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::posts::models::{Post, PostData};

/// Response DTO for post
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostResponseDto {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

impl From<Post> for PostResponseDto {
    fn from(p: Post) -> Self {
        Self {
            id: p.id,
            title: p.title,
            content: p.content,
            category_id: p.category_id,
            category_name: p.category_name,
            author: p.author,
            created_at: p.created_at,
        }
    }
}

/// Request DTO for creating or replacing a post
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PostPayloadDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub category_id: Option<i64>,

    #[validate(length(min = 1, max = 150, message = "Author must be 1-150 characters"))]
    pub author: String,
}

impl PostPayloadDto {
    /// Trim the single-line fields before validation
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.author = self.author.trim().to_string();
        self
    }
}

impl From<PostPayloadDto> for PostData {
    fn from(dto: PostPayloadDto) -> Self {
        Self {
            title: dto.title,
            content: dto.content,
            category_id: dto.category_id,
            author: dto.author,
        }
    }
}
