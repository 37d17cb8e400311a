pub mod admin;
pub mod blog;
pub mod categories;
pub mod posts;
