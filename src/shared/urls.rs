//! Named URL patterns with reverse and forward resolution.
//!
//! Patterns are written relative to the mount point, e.g. `"post/<int:pk>/"`.
//! A placeholder is `<converter:name>`; `<name>` alone uses the `str`
//! converter. The same table produces the axum route paths, so the paths
//! served and the paths generated for links cannot drift apart.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Invalid URL pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Reverse for '{0}' not found")]
    NoReverseMatch(String),
}

/// Path converter applied to a captured segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converter {
    /// Zero or positive integer
    Int,
    /// Any non-empty string without a slash
    Str,
    /// ASCII letters, digits, hyphens and underscores
    Slug,
}

impl Converter {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(Self::Int),
            "str" => Some(Self::Str),
            "slug" => Some(Self::Slug),
            _ => None,
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        if value.is_empty() || value.contains('/') {
            return false;
        }
        match self {
            Self::Int => value.bytes().all(|b| b.is_ascii_digit()) && value.parse::<i64>().is_ok(),
            Self::Str => true,
            Self::Slug => value
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'),
        }
    }

    /// Parse a segment captured by an `int` placeholder
    pub fn to_int(value: &str) -> Option<i64> {
        Self::Int.matches(value).then(|| value.parse().ok()).flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Param { converter: Converter, name: String },
}

/// Parsed form of a route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    parts: Vec<Part>,
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> Result<Self, UrlError> {
        let invalid = |reason: &str| UrlError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        if pattern.starts_with('/') {
            return Err(invalid("patterns are relative and must not start with '/'"));
        }

        let mut parts = Vec::new();
        let mut rest = pattern;
        while let Some(start) = rest.find('<') {
            if start > 0 {
                parts.push(Part::Literal(rest[..start].to_string()));
            }
            let end = rest[start..]
                .find('>')
                .map(|i| start + i)
                .ok_or_else(|| invalid("unclosed '<'"))?;
            let placeholder = &rest[start + 1..end];
            let (converter, name) = match placeholder.split_once(':') {
                Some((conv, name)) => (
                    Converter::from_name(conv)
                        .ok_or_else(|| invalid(&format!("unknown converter '{}'", conv)))?,
                    name,
                ),
                None => (Converter::Str, placeholder),
            };
            if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
                return Err(invalid(&format!("invalid parameter name '{}'", name)));
            }
            if matches!(parts.last(), Some(Part::Param { .. })) {
                return Err(invalid("adjacent parameters must be separated"));
            }
            if parts
                .iter()
                .any(|p| matches!(p, Part::Param { name: n, .. } if n == name))
            {
                return Err(invalid(&format!("duplicate parameter '{}'", name)));
            }
            parts.push(Part::Param {
                converter,
                name: name.to_string(),
            });
            rest = &rest[end + 1..];
        }
        if rest.contains('>') {
            return Err(invalid("unmatched '>'"));
        }
        if !rest.is_empty() {
            parts.push(Part::Literal(rest.to_string()));
        }

        Ok(Self { parts })
    }

    /// Path in axum's `{param}` syntax, rooted at `/`
    pub fn axum_path(&self) -> String {
        let mut path = String::from("/");
        for part in &self.parts {
            match part {
                Part::Literal(text) => path.push_str(text),
                Part::Param { name, .. } => {
                    path.push('{');
                    path.push_str(name);
                    path.push('}');
                }
            }
        }
        path
    }

    /// Names of the captured parameters, in order
    pub fn param_names(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Param { name, .. } => Some(name.as_str()),
                Part::Literal(_) => None,
            })
            .collect()
    }

    /// Match a path relative to the mount point (no leading `/`)
    pub fn match_path(&self, path: &str) -> Option<Vec<(String, String)>> {
        let mut rest = path;
        let mut kwargs = Vec::new();
        for part in &self.parts {
            match part {
                Part::Literal(text) => rest = rest.strip_prefix(text.as_str())?,
                Part::Param { converter, name } => {
                    let end = rest.find('/').unwrap_or(rest.len());
                    let value = &rest[..end];
                    if !converter.matches(value) {
                        return None;
                    }
                    kwargs.push((name.clone(), value.to_string()));
                    rest = &rest[end..];
                }
            }
        }
        rest.is_empty().then_some(kwargs)
    }

    fn build(&self, kwargs: &[(&str, String)]) -> Option<String> {
        let names = self.param_names();
        if kwargs.len() != names.len() || kwargs.iter().any(|(k, _)| !names.contains(k)) {
            return None;
        }

        let mut path = String::from("/");
        for part in &self.parts {
            match part {
                Part::Literal(text) => path.push_str(text),
                Part::Param { converter, name } => {
                    let value = kwargs
                        .iter()
                        .find(|(k, _)| *k == name.as_str())
                        .map(|(_, v)| v.as_str())?;
                    if !converter.matches(value) {
                        return None;
                    }
                    path.push_str(value);
                }
            }
        }
        Some(path)
    }
}

/// One entry of a URL table
#[derive(Debug, Clone, Copy)]
pub struct UrlPattern<V> {
    pub route: &'static str,
    pub view: V,
    pub name: &'static str,
}

/// Result of resolving a request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverMatch<V> {
    pub view: V,
    /// Namespaced route name, e.g. `blog:home`
    pub url_name: String,
    pub kwargs: Vec<(String, String)>,
}

/// A namespaced URL table
#[derive(Debug, Clone)]
pub struct UrlConf<V> {
    namespace: &'static str,
    entries: Vec<(UrlPattern<V>, RoutePattern)>,
}

impl<V: Copy> UrlConf<V> {
    pub fn new(namespace: &'static str, patterns: &[UrlPattern<V>]) -> Result<Self, UrlError> {
        let entries = patterns
            .iter()
            .map(|p| RoutePattern::parse(p.route).map(|parsed| (*p, parsed)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { namespace, entries })
    }

    /// Patterns with their axum paths, in declaration order
    pub fn routes(&self) -> impl Iterator<Item = (&UrlPattern<V>, String)> + '_ {
        self.entries
            .iter()
            .map(|(pattern, parsed)| (pattern, parsed.axum_path()))
    }

    /// Build the path for a namespaced route name
    pub fn reverse(&self, name: &str, kwargs: &[(&str, String)]) -> Result<String, UrlError> {
        let no_match = || UrlError::NoReverseMatch(name.to_string());
        let local = name
            .strip_prefix(self.namespace)
            .and_then(|rest| rest.strip_prefix(':'))
            .ok_or_else(no_match)?;

        self.entries
            .iter()
            .filter(|(pattern, _)| pattern.name == local)
            .find_map(|(_, parsed)| parsed.build(kwargs))
            .ok_or_else(no_match)
    }

    /// Find the route serving `path` (absolute, e.g. `/post/3/`)
    pub fn resolve(&self, path: &str) -> Option<ResolverMatch<V>> {
        let relative = path.strip_prefix('/').unwrap_or(path);
        self.entries.iter().find_map(|(pattern, parsed)| {
            parsed.match_path(relative).map(|kwargs| ResolverMatch {
                view: pattern.view,
                url_name: format!("{}:{}", self.namespace, pattern.name),
                kwargs,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum View {
        Index,
        Article,
        Tag,
    }

    const PATTERNS: &[UrlPattern<View>] = &[
        UrlPattern {
            route: "",
            view: View::Index,
            name: "index",
        },
        UrlPattern {
            route: "articles/<int:year>/<slug:title>/",
            view: View::Article,
            name: "article",
        },
        UrlPattern {
            route: "tags/<tag>/",
            view: View::Tag,
            name: "tag",
        },
    ];

    fn conf() -> UrlConf<View> {
        UrlConf::new("news", PATTERNS).unwrap()
    }

    #[test]
    fn test_axum_paths() {
        let paths: Vec<String> = conf().routes().map(|(_, path)| path).collect();
        assert_eq!(paths, vec!["/", "/articles/{year}/{title}/", "/tags/{tag}/"]);
    }

    #[test]
    fn test_reverse() {
        let conf = conf();
        assert_eq!(conf.reverse("news:index", &[]).unwrap(), "/");
        assert_eq!(
            conf.reverse(
                "news:article",
                &[("year", "2024".to_string()), ("title", "hello-world".to_string())]
            )
            .unwrap(),
            "/articles/2024/hello-world/"
        );
    }

    #[test]
    fn test_reverse_failures() {
        let conf = conf();
        let missing = UrlError::NoReverseMatch("news:article".to_string());
        let kw = |pairs: &[(&'static str, &str)]| -> Vec<(&'static str, String)> {
            pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
        };
        assert_eq!(
            conf.reverse("news:article", &kw(&[("year", "2024")])),
            Err(missing.clone())
        );
        assert_eq!(
            conf.reverse("news:article", &kw(&[("year", "-1"), ("title", "x")])),
            Err(missing.clone())
        );
        assert_eq!(
            conf.reverse(
                "news:article",
                &kw(&[("year", "1"), ("title", "x"), ("extra", "1")])
            ),
            Err(missing)
        );
        assert!(conf.reverse("index", &[]).is_err());
        assert!(conf.reverse("other:index", &[]).is_err());
        assert!(conf.reverse("news:missing", &[]).is_err());
    }

    #[test]
    fn test_resolve() {
        let conf = conf();
        let m = conf.resolve("/articles/2024/hello-world/").unwrap();
        assert_eq!(m.view, View::Article);
        assert_eq!(m.url_name, "news:article");
        assert_eq!(
            m.kwargs,
            vec![
                ("year".to_string(), "2024".to_string()),
                ("title".to_string(), "hello-world".to_string())
            ]
        );

        assert_eq!(conf.resolve("/").unwrap().view, View::Index);
        assert_eq!(conf.resolve("/tags/some tag/").unwrap().view, View::Tag);
        assert!(conf.resolve("/articles/twenty/hello/").is_none());
        assert!(conf.resolve("/articles/2024/hello-world").is_none());
        assert!(conf.resolve("/tags//").is_none());
    }

    #[test]
    fn test_converters() {
        assert!(Converter::Int.matches("0"));
        assert!(Converter::Int.matches("42"));
        assert!(!Converter::Int.matches("-1"));
        assert!(!Converter::Int.matches("+1"));
        assert!(!Converter::Int.matches("99999999999999999999"));
        assert!(Converter::Slug.matches("Hello_World-1"));
        assert!(!Converter::Slug.matches("hello world"));
        assert!(!Converter::Str.matches(""));
        assert_eq!(Converter::to_int("17"), Some(17));
        assert_eq!(Converter::to_int("abc"), None);
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(RoutePattern::parse("/leading/").is_err());
        assert!(RoutePattern::parse("post/<int:pk/").is_err());
        assert!(RoutePattern::parse("post/<float:pk>/").is_err());
        assert!(RoutePattern::parse("post/<int:pk>/<pk>/").is_err());
        assert!(RoutePattern::parse("post/<int:a><int:b>/").is_err());
        assert!(RoutePattern::parse("post/<int:>/").is_err());
    }
}
