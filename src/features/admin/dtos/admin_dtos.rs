use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};

use crate::features::admin::filters::DateFilter;
use crate::features::admin::site::RegisteredModel;
use crate::shared::constants::ADMIN_LIST_PER_PAGE;
use crate::shared::types::{page_limit, page_offset};

// =============================================================================
// REGISTRY DTOs
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PrepopulatedFieldDto {
    pub field: String,
    pub sources: Vec<String>,
}

/// A registered model and its admin options
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminModelDto {
    /// `<app_label>.<model_name>`
    pub key: String,
    pub app_label: String,
    pub model_name: String,
    /// Changelist URL
    pub url: String,
    pub list_display: Vec<String>,
    pub search_fields: Vec<String>,
    pub list_filter: Vec<String>,
    pub prepopulated_fields: Vec<PrepopulatedFieldDto>,
}

fn owned(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

impl From<&RegisteredModel> for AdminModelDto {
    fn from(m: &RegisteredModel) -> Self {
        Self {
            key: m.key(),
            app_label: m.app_label.to_string(),
            model_name: m.model_name.to_string(),
            url: format!("/admin/{}/{}", m.app_label, m.model_name),
            list_display: owned(m.admin.list_display),
            search_fields: owned(m.admin.search_fields),
            list_filter: owned(m.admin.list_filter),
            prepopulated_fields: m
                .admin
                .prepopulated_fields
                .iter()
                .map(|(field, sources)| PrepopulatedFieldDto {
                    field: field.to_string(),
                    sources: owned(sources),
                })
                .collect(),
        }
    }
}

// =============================================================================
// CHANGELIST DTOs
// =============================================================================

/// One selectable value in the filter sidebar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FilterChoiceDto {
    /// Query parameter and its value selecting this choice
    pub param: String,
    pub value: String,
    pub label: String,
}

impl FilterChoiceDto {
    pub fn new(param: &str, value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            param: param.to_string(),
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Choices for one `list_filter` field
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminFilterDto {
    pub field: String,
    pub choices: Vec<FilterChoiceDto>,
}

/// A page of the changelist
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminListDto {
    /// Row keys after `id`, in display order
    pub columns: Vec<String>,
    #[schema(value_type = Vec<Object>)]
    pub rows: Vec<Map<String, Value>>,
    pub filters: Vec<AdminFilterDto>,
}

// =============================================================================
// QUERY PARAMS
// =============================================================================

/// Query params for the category changelist
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct CategoryAdminQuery {
    /// Space separated terms, double quotes group a phrase
    pub search: Option<String>,
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
}

impl Default for CategoryAdminQuery {
    fn default() -> Self {
        Self {
            search: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl CategoryAdminQuery {
    pub fn offset(&self) -> i64 {
        page_offset(self.page, self.page_size)
    }
    pub fn limit(&self) -> i64 {
        page_limit(self.page_size)
    }
}

/// Query params for the post changelist
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PostAdminQuery {
    /// Space separated terms, double quotes group a phrase
    pub search: Option<String>,
    /// Creation date window
    #[param(value_type = Option<String>)]
    pub created_at: Option<DateFilter>,
    /// Exact author
    pub author: Option<String>,
    /// Category id
    pub category: Option<i64>,
    /// Only posts without a category
    pub uncategorized: Option<bool>,
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
}

impl Default for PostAdminQuery {
    fn default() -> Self {
        Self {
            search: None,
            created_at: None,
            author: None,
            category: None,
            uncategorized: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PostAdminQuery {
    pub fn offset(&self) -> i64 {
        page_offset(self.page, self.page_size)
    }
    pub fn limit(&self) -> i64 {
        page_limit(self.page_size)
    }
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    ADMIN_LIST_PER_PAGE
}
