use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    http::{header, HeaderValue, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use minijinja::context;
use serde::Serialize;

use crate::core::error::AppError;
use crate::features::blog::urls::BlogView;
use crate::features::posts::models::Post;
use crate::features::posts::PostService;
use crate::shared::templates::{render_template, TemplateError};
use crate::shared::urls::{Converter, UrlConf, UrlError};

#[derive(Clone)]
pub struct BlogState {
    pub posts: Arc<PostService>,
    pub urls: Arc<UrlConf<BlogView>>,
}

/// Error page for HTML views
#[derive(Debug)]
pub enum PageError {
    NotFound { path: String },
    Server(String),
}

impl PageError {
    fn from_app(err: AppError, path: &str) -> Self {
        match err {
            AppError::NotFound(_) => PageError::NotFound {
                path: path.to_string(),
            },
            other => PageError::Server(other.to_string()),
        }
    }
}

impl From<TemplateError> for PageError {
    fn from(e: TemplateError) -> Self {
        PageError::Server(e.to_string())
    }
}

impl From<UrlError> for PageError {
    fn from(e: UrlError) -> Self {
        PageError::Server(e.to_string())
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::NotFound { path } => not_found_page(&path),
            PageError::Server(msg) => {
                tracing::error!("Page failed to render: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, Html("<h1>Server Error (500)</h1>"))
                    .into_response()
            }
        }
    }
}

fn not_found_page(path: &str) -> Response {
    match render_template("404.html", context! { path => path, home_url => "/" }) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render 404 page: {}", e);
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
    }
}

/// Post as shown on the public pages
#[derive(Debug, Serialize)]
struct PostView {
    title: String,
    content: String,
    author: String,
    category: Option<String>,
    created_at: String,
    url: String,
}

impl PostView {
    fn new(post: Post, urls: &UrlConf<BlogView>) -> Result<Self, UrlError> {
        let url = urls.reverse("blog:post_detail", &[("pk", post.id.to_string())])?;
        Ok(Self {
            title: post.title,
            content: post.content,
            author: post.author,
            category: post.category_name,
            created_at: post.created_at.format("%B %-d, %Y, %H:%M").to_string(),
            url,
        })
    }
}

/// All posts, newest first
pub async fn home(State(state): State<BlogState>) -> Result<Html<String>, PageError> {
    let home_url = state.urls.reverse("blog:home", &[])?;
    let posts = state
        .posts
        .list_all()
        .await
        .map_err(|e| PageError::from_app(e, &home_url))?
        .into_iter()
        .map(|p| PostView::new(p, &state.urls))
        .collect::<Result<Vec<_>, _>>()?;

    let html = render_template(
        "blog/home.html",
        context! { posts => posts, home_url => home_url },
    )?;
    Ok(Html(html))
}

/// A single post looked up by primary key
pub async fn post_detail(
    State(state): State<BlogState>,
    OriginalUri(uri): OriginalUri,
    Path(pk): Path<String>,
) -> Result<Html<String>, PageError> {
    let not_found = || PageError::NotFound {
        path: uri.path().to_string(),
    };
    let pk = Converter::to_int(&pk).ok_or_else(not_found)?;

    let post = state
        .posts
        .get(pk)
        .await
        .map_err(|e| PageError::from_app(e, uri.path()))?;
    let post = PostView::new(post, &state.urls)?;
    let home_url = state.urls.reverse("blog:home", &[])?;

    let html = render_template(
        "blog/post_detail.html",
        context! { post => post, home_url => home_url },
    )?;
    Ok(Html(html))
}

/// Unmatched paths: redirect to the slashed path when that one resolves,
/// otherwise render the 404 page
pub async fn fallback(State(state): State<BlogState>, method: Method, uri: Uri) -> Response {
    let path = uri.path();
    let redirectable = (method == Method::GET || method == Method::HEAD) && !path.ends_with('/');

    if redirectable && state.urls.resolve(&format!("{}/", path)).is_some() {
        let location = match uri.query() {
            Some(query) => format!("{}/?{}", path, query),
            None => format!("{}/", path),
        };
        if let Ok(location) = HeaderValue::from_str(&location) {
            return (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response();
        }
    }

    not_found_page(path)
}
