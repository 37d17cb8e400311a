use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::core::error::{AppError, Result};
use crate::features::categories::models::{Category, CategoryData};
use crate::features::posts::models::{Post, PostData};
use crate::modules::storage::{
    BlogStore, CategoryFilter, CategoryListQuery, PostListQuery, SearchQuery,
};

const CATEGORY_COLUMNS: &str = "c.id, c.name, c.slug, c.description, c.created_at";

const POST_COLUMNS: &str = "p.id, p.title, p.content, p.category_id, c.name AS category_name, p.author, p.created_at";

/// PostgreSQL-backed store, schema in `migrations/`
pub struct PgBlogStore {
    pool: PgPool,
}

impl PgBlogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn category_column(field: &str) -> Option<&'static str> {
    match field {
        "name" => Some("c.name"),
        "slug" => Some("c.slug"),
        "description" => Some("c.description"),
        _ => None,
    }
}

fn post_column(field: &str) -> Option<&'static str> {
    match field {
        "title" => Some("p.title"),
        "content" => Some("p.content"),
        "author" => Some("p.author"),
        "category" => Some("c.name"),
        _ => None,
    }
}

/// Escape LIKE wildcards so a term matches literally
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn push_search(
    qb: &mut QueryBuilder<'_, Postgres>,
    search: &SearchQuery,
    column: fn(&str) -> Option<&'static str>,
) -> Result<()> {
    if search.is_empty() {
        return Ok(());
    }

    let columns = search
        .fields
        .iter()
        .map(|field| {
            column(field)
                .ok_or_else(|| AppError::Internal(format!("Unknown search field '{}'", field)))
        })
        .collect::<Result<Vec<_>>>()?;

    for term in &search.terms {
        let pattern = like_pattern(term);
        qb.push(" AND (");
        for (i, col) in columns.iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push(*col).push(" ILIKE ").push_bind(pattern.clone());
        }
        qb.push(")");
    }
    Ok(())
}

fn push_post_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &PostListQuery) -> Result<()> {
    push_search(qb, &query.search, post_column)?;

    if let Some(range) = query.created {
        qb.push(" AND p.created_at >= ")
            .push_bind(range.start)
            .push(" AND p.created_at < ")
            .push_bind(range.end);
    }
    if let Some(author) = &query.author {
        qb.push(" AND p.author = ").push_bind(author.clone());
    }
    match query.category {
        Some(CategoryFilter::Id(id)) => {
            qb.push(" AND p.category_id = ").push_bind(id);
        }
        Some(CategoryFilter::Uncategorized) => {
            qb.push(" AND p.category_id IS NULL");
        }
        None => {}
    }
    Ok(())
}

fn push_window(qb: &mut QueryBuilder<'_, Postgres>, offset: i64, limit: Option<i64>) {
    if let Some(limit) = limit {
        qb.push(" LIMIT ").push_bind(limit);
    }
    qb.push(" OFFSET ").push_bind(offset.max(0));
}

/// Map constraint violations to client errors
fn write_error(context: &str, e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return AppError::Conflict("Category with this slug already exists".to_string());
        }
        if db.is_foreign_key_violation() {
            return AppError::BadRequest("Selected category does not exist".to_string());
        }
    }
    tracing::error!("Failed to {}: {:?}", context, e);
    AppError::Database(e)
}

fn read_error(context: &str, e: sqlx::Error) -> AppError {
    tracing::error!("Failed to {}: {:?}", context, e);
    AppError::Database(e)
}

#[async_trait]
impl BlogStore for PgBlogStore {
    async fn list_categories(&self, query: &CategoryListQuery) -> Result<(Vec<Category>, i64)> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM categories c WHERE TRUE");
        push_search(&mut count, &query.search, category_column)?;
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| read_error("count categories", e))?;

        let mut select = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM categories c WHERE TRUE",
            CATEGORY_COLUMNS
        ));
        push_search(&mut select, &query.search, category_column)?;
        select.push(" ORDER BY c.created_at DESC, c.id DESC");
        push_window(&mut select, query.offset, query.limit);

        let categories = select
            .build_query_as::<Category>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| read_error("list categories", e))?;

        Ok((categories, total))
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {} FROM categories c WHERE c.id = $1",
            CATEGORY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| read_error("get category", e))
    }

    async fn create_category(&self, data: CategoryData) -> Result<Category> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, slug, description)
            VALUES ($1, $2, $3)
            RETURNING id, name, slug, description, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.slug)
        .bind(data.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("create category", e))
    }

    async fn update_category(&self, id: i64, data: CategoryData) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $1, slug = $2, description = $3
            WHERE id = $4
            RETURNING id, name, slug, description, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.slug)
        .bind(data.description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error("update category", e))
    }

    async fn delete_category(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| read_error("delete category", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(&self, query: &PostListQuery) -> Result<(Vec<Post>, i64)> {
        let mut count = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM posts p LEFT JOIN categories c ON c.id = p.category_id WHERE TRUE",
        );
        push_post_filters(&mut count, query)?;
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| read_error("count posts", e))?;

        let mut select = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM posts p LEFT JOIN categories c ON c.id = p.category_id WHERE TRUE",
            POST_COLUMNS
        ));
        push_post_filters(&mut select, query)?;
        select.push(" ORDER BY p.created_at DESC, p.id DESC");
        push_window(&mut select, query.offset, query.limit);

        let posts = select
            .build_query_as::<Post>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| read_error("list posts", e))?;

        Ok((posts, total))
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>> {
        sqlx::query_as::<_, Post>(&format!(
            "SELECT {} FROM posts p LEFT JOIN categories c ON c.id = p.category_id WHERE p.id = $1",
            POST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| read_error("get post", e))
    }

    async fn create_post(&self, data: PostData) -> Result<Post> {
        sqlx::query_as::<_, Post>(&format!(
            r#"
            WITH p AS (
                INSERT INTO posts (title, content, category_id, author)
                VALUES ($1, $2, $3, $4)
                RETURNING *
            )
            SELECT {} FROM p LEFT JOIN categories c ON c.id = p.category_id
            "#,
            POST_COLUMNS
        ))
        .bind(data.title)
        .bind(data.content)
        .bind(data.category_id)
        .bind(data.author)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("create post", e))
    }

    async fn update_post(&self, id: i64, data: PostData) -> Result<Option<Post>> {
        sqlx::query_as::<_, Post>(&format!(
            r#"
            WITH p AS (
                UPDATE posts
                SET title = $1, content = $2, category_id = $3, author = $4
                WHERE id = $5
                RETURNING *
            )
            SELECT {} FROM p LEFT JOIN categories c ON c.id = p.category_id
            "#,
            POST_COLUMNS
        ))
        .bind(data.title)
        .bind(data.content)
        .bind(data.category_id)
        .bind(data.author)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error("update post", e))
    }

    async fn delete_post(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| read_error("delete post", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_post_authors(&self) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>("SELECT DISTINCT author FROM posts ORDER BY author")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| read_error("list post authors", e))
    }
}
