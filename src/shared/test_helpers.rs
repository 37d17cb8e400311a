use axum::http::HeaderValue;
use base64::prelude::*;
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::faker::name::en::Name;
use fake::Fake;

use crate::core::config::{
    AdminConfig, AppConfig, Config, StorageBackend, StorageConfig, SwaggerConfig,
};
use crate::features::posts::dtos::PostPayloadDto;

/// In-memory config with the admin enabled as `admin:secret`
pub fn test_config() -> Config {
    Config {
        app: AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_allowed_origins: vec!["*".to_string()],
        },
        storage: StorageConfig {
            backend: StorageBackend::Memory,
            database: None,
        },
        admin: AdminConfig {
            username: Some("admin".to_string()),
            password: Some("secret".to_string()),
        },
        swagger: SwaggerConfig {
            username: None,
            password: None,
            title: "Blog API".to_string(),
            version: "0.0.0".to_string(),
            description: "Test".to_string(),
        },
    }
}

pub fn basic_auth_header(username: &str, password: &str) -> HeaderValue {
    let encoded = BASE64_STANDARD.encode(format!("{}:{}", username, password));
    HeaderValue::from_str(&format!("Basic {}", encoded)).expect("valid header value")
}

/// Valid post payload with generated content and no category
pub fn fake_post_payload() -> PostPayloadDto {
    PostPayloadDto {
        title: Sentence(3..6).fake(),
        content: Paragraph(2..4).fake(),
        category_id: None,
        author: Name().fake(),
    }
}
