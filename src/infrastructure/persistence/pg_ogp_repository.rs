//! PostgreSQL implementation of OGP repository.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Ogp, OgpFields};
use crate::domain::repositories::OgpRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct OgpRow {
    id: i64,
    page_id: i64,
    title: String,
    image: String,
    description: String,
}

impl From<OgpRow> for Ogp {
    fn from(r: OgpRow) -> Self {
        Ogp::new(r.id, r.page_id, r.title, r.image, r.description)
    }
}

/// Creates the page's OGP record, or updates it in place keeping its id.
///
/// Runs on the caller's connection so it joins an open transaction.
pub(super) async fn upsert_for_page(
    conn: &mut PgConnection,
    page_id: i64,
    fields: &OgpFields,
) -> Result<Ogp, sqlx::Error> {
    let row = sqlx::query_as::<_, OgpRow>(
        r#"
        INSERT INTO ogps (page_id, title, image, description)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (page_id) DO UPDATE
        SET title = EXCLUDED.title,
            image = EXCLUDED.image,
            description = EXCLUDED.description
        RETURNING id, page_id, title, image, description
        "#,
    )
    .bind(page_id)
    .bind(&fields.title)
    .bind(&fields.image)
    .bind(&fields.description)
    .fetch_one(conn)
    .await?;

    Ok(row.into())
}

/// Deletes the page's OGP record, if any.
pub(super) async fn delete_for_page(
    conn: &mut PgConnection,
    page_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM ogps WHERE page_id = $1")
        .bind(page_id)
        .execute(conn)
        .await?;

    Ok(())
}

/// PostgreSQL repository for OGP preview metadata.
pub struct PgOgpRepository {
    pool: Arc<PgPool>,
}

impl PgOgpRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OgpRepository for PgOgpRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Ogp>, AppError> {
        let row = sqlx::query_as::<_, OgpRow>(
            r#"
            SELECT id, page_id, title, image, description
            FROM ogps
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Ogp::from))
    }
}
