//! PostgreSQL implementation of page view repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewPageView, PageView};
use crate::domain::repositories::PageViewRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct PageViewRow {
    id: i64,
    slug: String,
    real_ip: Option<String>,
    referer: Option<String>,
    mobile: bool,
    platform: Option<String>,
    os: Option<String>,
    browser_name: Option<String>,
    created_at: DateTime<Utc>,
}

/// PostgreSQL repository for page view analytics.
pub struct PgPageViewRepository {
    pool: Arc<PgPool>,
}

impl PgPageViewRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PageViewRepository for PgPageViewRepository {
    async fn record(&self, new_view: NewPageView) -> Result<PageView, AppError> {
        let r = sqlx::query_as::<_, PageViewRow>(
            r#"
            INSERT INTO page_views (slug, real_ip, referer, mobile, platform, os, browser_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, slug, real_ip, referer, mobile, platform, os, browser_name, created_at
            "#,
        )
        .bind(&new_view.slug)
        .bind(&new_view.real_ip)
        .bind(&new_view.referer)
        .bind(new_view.mobile)
        .bind(&new_view.platform)
        .bind(&new_view.os)
        .bind(&new_view.browser_name)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(PageView {
            id: r.id,
            slug: r.slug,
            real_ip: r.real_ip,
            referer: r.referer,
            mobile: r.mobile,
            platform: r.platform,
            os: r.os,
            browser_name: r.browser_name,
            created_at: r.created_at,
        })
    }

    async fn count_by_slug(&self, slug: &str) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM page_views WHERE slug = $1")
            .bind(slug)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
