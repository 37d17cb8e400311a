use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::categories::models::{Category, CategoryData};

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            created_at: c.created_at,
        }
    }
}

/// Request DTO for creating or replacing a category.
///
/// A blank `slug` is filled in from `name`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CategoryPayloadDto {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(
        length(min = 1, max = 50, message = "Slug must be 1-50 characters"),
        regex(
            path = "*crate::shared::validation::SLUG_REGEX",
            message = "Slug must be lowercase letters, numbers and single hyphens"
        )
    )]
    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

impl CategoryPayloadDto {
    /// Treat whitespace-only optional fields as absent
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.slug = self
            .slug
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self.description = self.description.filter(|d| !d.trim().is_empty());
        self
    }
}

impl From<CategoryPayloadDto> for CategoryData {
    fn from(dto: CategoryPayloadDto) -> Self {
        Self {
            name: dto.name,
            slug: dto.slug.unwrap_or_default(),
            description: dto.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str, slug: Option<&str>) -> CategoryPayloadDto {
        CategoryPayloadDto {
            name: name.to_string(),
            slug: slug.map(str::to_string),
            description: Some("   ".to_string()),
        }
    }

    #[test]
    fn test_normalized_drops_blank_fields() {
        let dto = payload("  Tech ", Some("  ")).normalized();
        assert_eq!(dto.name, "Tech");
        assert_eq!(dto.slug, None);
        assert_eq!(dto.description, None);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_invalid_slug_is_rejected() {
        assert!(payload("Tech", Some("Not A Slug")).normalized().validate().is_err());
        assert!(payload("", None).normalized().validate().is_err());
        assert!(payload("Tech", Some("tech-news")).normalized().validate().is_ok());
    }
}
