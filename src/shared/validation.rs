use lazy_static::lazy_static;
use regex::Regex;

use crate::shared::constants::SLUG_MAX_LENGTH;

lazy_static! {
    /// Regex for validating slug fields
    /// Must be lowercase alphanumeric with single hyphens between words
    /// - Valid: "tech", "rust-systems", "web3"
    /// - Invalid: "-tech", "tech-", "rust--systems", "Tech", "rust_systems"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

/// Derive a slug from free text.
///
/// Non-ASCII characters are transliterated, everything that is not
/// alphanumeric collapses into single hyphens, and the result is cut to
/// `SLUG_MAX_LENGTH` without leaving a trailing hyphen.
pub fn slugify(value: &str) -> String {
    let slug = slug::slugify(value);
    let truncated: String = slug.chars().take(SLUG_MAX_LENGTH).collect();
    truncated.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_regex_valid() {
        assert!(SLUG_REGEX.is_match("tech"));
        assert!(SLUG_REGEX.is_match("rust-systems"));
        assert!(SLUG_REGEX.is_match("web3"));
        assert!(SLUG_REGEX.is_match("a-b-c"));
    }

    #[test]
    fn test_slug_regex_invalid() {
        assert!(!SLUG_REGEX.is_match("-tech")); // starts with hyphen
        assert!(!SLUG_REGEX.is_match("tech-")); // ends with hyphen
        assert!(!SLUG_REGEX.is_match("rust--systems")); // double hyphen
        assert!(!SLUG_REGEX.is_match("Tech")); // uppercase
        assert!(!SLUG_REGEX.is_match("rust_systems")); // underscore
        assert!(!SLUG_REGEX.is_match("")); // empty
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Tech"), "tech");
        assert_eq!(slugify("Rust & Systems"), "rust-systems");
        assert_eq!(slugify("  Hello,   World!  "), "hello-world");
        assert_eq!(slugify("Café"), "cafe");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_truncates_without_trailing_hyphen() {
        // 49 letters then a word boundary
        let name = format!("{} tail", "a".repeat(49));
        let slug = slugify(&name);
        assert_eq!(slug, "a".repeat(49));
        assert!(slug.len() <= SLUG_MAX_LENGTH);
        assert!(SLUG_REGEX.is_match(&slug));
    }
}
