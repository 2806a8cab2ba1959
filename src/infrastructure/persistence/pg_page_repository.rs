//! PostgreSQL implementation of page repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use super::pg_ogp_repository::{delete_for_page, upsert_for_page};
use crate::domain::entities::{NewPage, Ogp, OgpFields, Page};
use crate::domain::repositories::PageRepository;
use crate::error::AppError;
use crate::utils::db_error::is_unique_violation_on_slug;

const SELECT_PAGE: &str = r#"
    SELECT p.id, p.slug, p.user_id, p.url, p.created_at,
           o.id AS ogp_id, o.title AS ogp_title, o.image AS ogp_image,
           o.description AS ogp_description
    FROM pages p
    LEFT JOIN ogps o ON o.page_id = p.id
"#;

#[derive(sqlx::FromRow)]
struct PageRow {
    id: i64,
    slug: String,
    user_id: i64,
    url: String,
    created_at: DateTime<Utc>,
    ogp_id: Option<i64>,
    ogp_title: Option<String>,
    ogp_image: Option<String>,
    ogp_description: Option<String>,
}

impl From<PageRow> for Page {
    fn from(r: PageRow) -> Self {
        let ogp = r.ogp_id.map(|ogp_id| {
            Ogp::new(
                ogp_id,
                r.id,
                r.ogp_title.unwrap_or_default(),
                r.ogp_image.unwrap_or_default(),
                r.ogp_description.unwrap_or_default(),
            )
        });

        Page::new(r.id, r.slug, r.user_id, r.url, r.created_at).with_ogp(ogp)
    }
}

/// PostgreSQL repository for pages.
///
/// Lookups join the optional OGP record so the redirect path gets both in a
/// single round trip.
pub struct PgPageRepository {
    pool: Arc<PgPool>,
}

impl PgPageRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PageRepository for PgPageRepository {
    async fn create(&self, new_page: NewPage) -> Result<Page, AppError> {
        let mut tx = self.pool.begin().await?;

        let (id, slug, user_id, url, created_at) =
            sqlx::query_as::<_, (i64, String, i64, String, DateTime<Utc>)>(
                r#"
                INSERT INTO pages (slug, user_id, url)
                VALUES ($1, $2, $3)
                RETURNING id, slug, user_id, url, created_at
                "#,
            )
            .bind(&new_page.slug)
            .bind(new_page.user_id)
            .bind(&new_page.url)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation_on_slug(&e) {
                    AppError::conflict("Slug already taken", json!({ "slug": new_page.slug }))
                } else {
                    e.into()
                }
            })?;

        let ogp = match &new_page.ogp {
            Some(fields) => Some(upsert_for_page(&mut tx, id, fields).await?),
            None => None,
        };

        tx.commit().await?;

        Ok(Page::new(id, slug, user_id, url, created_at).with_ogp(ogp))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Page>, AppError> {
        let sql = format!("{SELECT_PAGE} WHERE p.slug = $1");
        let row = sqlx::query_as::<_, PageRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Page::from))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Page>, AppError> {
        let sql = format!("{SELECT_PAGE} WHERE p.id = $1");
        let row = sqlx::query_as::<_, PageRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Page::from))
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Page>, AppError> {
        let sql = format!("{SELECT_PAGE} WHERE p.user_id = $1 ORDER BY p.created_at DESC, p.id DESC");
        let rows = sqlx::query_as::<_, PageRow>(&sql)
            .bind(user_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Page::from).collect())
    }

    async fn update(
        &self,
        id: i64,
        url: &str,
        ogp: Option<OgpFields>,
    ) -> Result<Page, AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE pages
            SET url = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(url)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(AppError::not_found("Page not found", json!({ "id": id })));
        }

        match &ogp {
            Some(fields) => {
                upsert_for_page(&mut tx, id, fields).await?;
            }
            None => delete_for_page(&mut tx, id).await?,
        }

        let sql = format!("{SELECT_PAGE} WHERE p.id = $1");
        let row = sqlx::query_as::<_, PageRow>(&sql)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pages")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
