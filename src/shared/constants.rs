/// Rows per admin changelist page
pub const ADMIN_LIST_PER_PAGE: i64 = 100;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Maximum length of a generated or submitted slug
pub const SLUG_MAX_LENGTH: usize = 50;

/// Realm announced in admin Basic auth challenges
pub const ADMIN_REALM: &str = "Blog administration";

/// Realm announced in Swagger UI Basic auth challenges
pub const SWAGGER_REALM: &str = "Swagger UI";
