use crate::shared::urls::{UrlConf, UrlError, UrlPattern};

/// Namespace of the public blog routes
pub const APP_NAME: &str = "blog";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlogView {
    Home,
    PostDetail,
}

pub const URL_PATTERNS: &[UrlPattern<BlogView>] = &[
    UrlPattern {
        route: "",
        view: BlogView::Home,
        name: "home",
    },
    UrlPattern {
        route: "post/<int:pk>/",
        view: BlogView::PostDetail,
        name: "post_detail",
    },
];

pub fn urlconf() -> Result<UrlConf<BlogView>, UrlError> {
    UrlConf::new(APP_NAME, URL_PATTERNS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_reverses_to_root() {
        let urls = urlconf().unwrap();
        assert_eq!(urls.reverse("blog:home", &[]).unwrap(), "/");

        let matched = urls.resolve("/").unwrap();
        assert_eq!(matched.view, BlogView::Home);
        assert_eq!(matched.url_name, "blog:home");
        assert!(matched.kwargs.is_empty());
    }

    #[test]
    fn test_post_detail_binds_pk() {
        let urls = urlconf().unwrap();
        for pk in [0_i64, 7, 12345] {
            let path = urls
                .reverse("blog:post_detail", &[("pk", pk.to_string())])
                .unwrap();
            assert_eq!(path, format!("/post/{}/", pk));

            let matched = urls.resolve(&path).unwrap();
            assert_eq!(matched.view, BlogView::PostDetail);
            assert_eq!(matched.url_name, "blog:post_detail");
            assert_eq!(matched.kwargs, vec![("pk".to_string(), pk.to_string())]);
        }
    }

    #[test]
    fn test_post_detail_rejects_non_integers() {
        let urls = urlconf().unwrap();
        assert!(urls.resolve("/post/abc/").is_none());
        assert!(urls.resolve("/post/-1/").is_none());
        assert!(urls.resolve("/post/3").is_none());
        assert!(urls
            .reverse("blog:post_detail", &[("pk", "abc".to_string())])
            .is_err());
        assert!(urls.reverse("blog:post_detail", &[]).is_err());
    }

    #[test]
    fn test_axum_paths() {
        let urls = urlconf().unwrap();
        let paths: Vec<String> = urls.routes().map(|(_, path)| path).collect();
        assert_eq!(paths, vec!["/", "/post/{pk}/"]);
    }
}
