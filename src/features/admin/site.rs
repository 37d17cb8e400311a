//! Declarative admin registry.
//!
//! A model type implements [`AdminModel`] to describe its fields; a
//! [`ModelAdmin`] value declares how the admin lists, searches, filters and
//! pre-fills it. [`AdminSite::register`] checks the declaration against the
//! model's fields before accepting it.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::core::error::AppError;
use crate::shared::validation::slugify;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdminError {
    #[error("The model {0} is already registered")]
    AlreadyRegistered(String),

    #[error("The model {0} is not registered")]
    NotRegistered(String),

    #[error("{model}: {message}")]
    ImproperlyConfigured { model: String, message: String },
}

impl From<AdminError> for AppError {
    fn from(e: AdminError) -> Self {
        AppError::Internal(e.to_string())
    }
}

/// A model the admin can manage
pub trait AdminModel {
    const APP_LABEL: &'static str;
    const MODEL_NAME: &'static str;
    /// Every field the admin may reference
    const FIELDS: &'static [&'static str];

    fn pk(&self) -> i64;

    /// JSON value shown in a list column, `None` for unknown fields
    fn display_value(&self, field: &str) -> Option<Value>;
}

/// An admin form whose fields can be read and pre-filled
pub trait AdminForm {
    fn field_value(&self, field: &str) -> Option<String>;

    fn set_field_value(&mut self, field: &str, value: String);
}

/// Per-model admin options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelAdmin {
    /// Columns of the list view
    pub list_display: &'static [&'static str],
    /// Fields matched by the search box
    pub search_fields: &'static [&'static str],
    /// Fields offered in the filter sidebar
    pub list_filter: &'static [&'static str],
    /// `(target, sources)`: target is slugified from the sources when blank
    pub prepopulated_fields: &'static [(&'static str, &'static [&'static str])],
}

impl ModelAdmin {
    fn check(&self, model: &str, fields: &[&str]) -> Result<(), AdminError> {
        let improper = |option: &str, field: &str| AdminError::ImproperlyConfigured {
            model: model.to_string(),
            message: format!("{} refers to '{}', which is not a field", option, field),
        };

        let options = [
            ("list_display", self.list_display),
            ("search_fields", self.search_fields),
            ("list_filter", self.list_filter),
        ];
        for (option, names) in options {
            if let Some(field) = names.iter().find(|f| !fields.contains(f)) {
                return Err(improper(option, field));
            }
        }

        for (target, sources) in self.prepopulated_fields {
            if !fields.contains(target) {
                return Err(improper("prepopulated_fields", target));
            }
            if sources.is_empty() {
                return Err(AdminError::ImproperlyConfigured {
                    model: model.to_string(),
                    message: format!("prepopulated_fields['{}'] has no source fields", target),
                });
            }
            if let Some(field) = sources.iter().find(|f| !fields.contains(f)) {
                return Err(improper("prepopulated_fields", field));
            }
        }
        Ok(())
    }

    /// The list row for `item`: its pk plus every `list_display` column
    pub fn project_row<M: AdminModel>(&self, item: &M) -> Map<String, Value> {
        let mut row = Map::new();
        row.insert("id".to_string(), Value::from(item.pk()));
        for field in self.list_display {
            row.insert(
                field.to_string(),
                item.display_value(field).unwrap_or(Value::Null),
            );
        }
        row
    }

    /// Fill blank prepopulated targets from their source fields
    pub fn apply_prepopulated<F: AdminForm>(&self, form: &mut F) {
        for (target, sources) in self.prepopulated_fields {
            if !form.field_value(target).is_none_or_blank() {
                continue;
            }
            let source_text = sources
                .iter()
                .filter_map(|field| form.field_value(field))
                .collect::<Vec<_>>()
                .join(" ");
            form.set_field_value(target, slugify(&source_text));
        }
    }
}

trait BlankExt {
    fn is_none_or_blank(&self) -> bool;
}

impl BlankExt for Option<String> {
    fn is_none_or_blank(&self) -> bool {
        self.as_deref().map_or(true, |v| v.trim().is_empty())
    }
}

/// A registered model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredModel {
    pub app_label: &'static str,
    pub model_name: &'static str,
    pub admin: ModelAdmin,
}

impl RegisteredModel {
    pub fn key(&self) -> String {
        model_key(self.app_label, self.model_name)
    }
}

fn model_key(app_label: &str, model_name: &str) -> String {
    format!("{}.{}", app_label, model_name)
}

/// The registry of admin-managed models
#[derive(Debug, Default)]
pub struct AdminSite {
    models: BTreeMap<String, RegisteredModel>,
}

impl AdminSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<M: AdminModel>(&mut self, admin: ModelAdmin) -> Result<(), AdminError> {
        let key = model_key(M::APP_LABEL, M::MODEL_NAME);
        if self.models.contains_key(&key) {
            return Err(AdminError::AlreadyRegistered(key));
        }
        admin.check(&key, M::FIELDS)?;

        tracing::debug!("Registered admin for {}", key);
        self.models.insert(
            key,
            RegisteredModel {
                app_label: M::APP_LABEL,
                model_name: M::MODEL_NAME,
                admin,
            },
        );
        Ok(())
    }

    /// Look up a registration by `"<app_label>.<model_name>"`
    pub fn get(&self, key: &str) -> Option<&RegisteredModel> {
        self.models.get(key)
    }

    /// Admin options of a registered model
    pub fn admin_for<M: AdminModel>(&self) -> Result<&ModelAdmin, AdminError> {
        let key = model_key(M::APP_LABEL, M::MODEL_NAME);
        self.get(&key)
            .map(|m| &m.admin)
            .ok_or(AdminError::NotRegistered(key))
    }

    /// Registered models ordered by key
    pub fn models(&self) -> impl Iterator<Item = &RegisteredModel> {
        self.models.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Book {
        id: i64,
        title: String,
    }

    impl AdminModel for Book {
        const APP_LABEL: &'static str = "library";
        const MODEL_NAME: &'static str = "book";
        const FIELDS: &'static [&'static str] = &["title", "slug", "isbn"];

        fn pk(&self) -> i64 {
            self.id
        }

        fn display_value(&self, field: &str) -> Option<Value> {
            match field {
                "title" => Some(Value::from(self.title.clone())),
                _ => None,
            }
        }
    }

    #[derive(Default)]
    struct BookForm {
        title: String,
        slug: Option<String>,
    }

    impl AdminForm for BookForm {
        fn field_value(&self, field: &str) -> Option<String> {
            match field {
                "title" => Some(self.title.clone()),
                "slug" => self.slug.clone(),
                _ => None,
            }
        }

        fn set_field_value(&mut self, field: &str, value: String) {
            if field == "slug" {
                self.slug = Some(value);
            }
        }
    }

    fn book_admin() -> ModelAdmin {
        ModelAdmin {
            list_display: &["title", "isbn"],
            search_fields: &["title"],
            prepopulated_fields: &[("slug", &["title"])],
            ..Default::default()
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut site = AdminSite::new();
        site.register::<Book>(book_admin()).unwrap();

        assert!(site.get("library.book").is_some());
        assert_eq!(site.admin_for::<Book>().unwrap(), &book_admin());
        assert_eq!(site.get("library.book").unwrap().model_name, "book");
        assert!(site.get("library.author").is_none());
        let keys: Vec<String> = site.models().map(|m| m.key()).collect();
        assert_eq!(keys, vec!["library.book"]);
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut site = AdminSite::new();
        site.register::<Book>(book_admin()).unwrap();
        assert_eq!(
            site.register::<Book>(ModelAdmin::default()),
            Err(AdminError::AlreadyRegistered("library.book".to_string()))
        );
    }

    #[test]
    fn test_unknown_fields_are_improperly_configured() {
        let bad_options = [
            ModelAdmin {
                list_display: &["price"],
                ..Default::default()
            },
            ModelAdmin {
                search_fields: &["author"],
                ..Default::default()
            },
            ModelAdmin {
                list_filter: &["year"],
                ..Default::default()
            },
            ModelAdmin {
                prepopulated_fields: &[("code", &["title"])],
                ..Default::default()
            },
            ModelAdmin {
                prepopulated_fields: &[("slug", &["subtitle"])],
                ..Default::default()
            },
            ModelAdmin {
                prepopulated_fields: &[("slug", &[])],
                ..Default::default()
            },
        ];

        for admin in bad_options {
            let mut site = AdminSite::new();
            let err = site.register::<Book>(admin).unwrap_err();
            assert!(matches!(err, AdminError::ImproperlyConfigured { .. }));
            assert!(site.get("library.book").is_none());
        }
    }

    #[test]
    fn test_unregistered_model() {
        let site = AdminSite::new();
        assert_eq!(
            site.admin_for::<Book>(),
            Err(AdminError::NotRegistered("library.book".to_string()))
        );
    }

    #[test]
    fn test_project_row() {
        let book = Book {
            id: 7,
            title: "Dune".to_string(),
        };
        let row = book_admin().project_row(&book);
        assert_eq!(Value::Object(row), serde_json::json!({"id": 7, "title": "Dune", "isbn": null}));
    }

    #[test]
    fn test_prepopulate_only_fills_blank_targets() {
        let admin = book_admin();

        let mut form = BookForm {
            title: "The Left Hand of Darkness".to_string(),
            slug: None,
        };
        admin.apply_prepopulated(&mut form);
        assert_eq!(form.slug.as_deref(), Some("the-left-hand-of-darkness"));

        let mut form = BookForm {
            title: "Dune".to_string(),
            slug: Some("custom".to_string()),
        };
        admin.apply_prepopulated(&mut form);
        assert_eq!(form.slug.as_deref(), Some("custom"));
    }
}
