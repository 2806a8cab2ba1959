//! DTOs for the page endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{Ogp, OgpFields, Page};

/// OGP metadata supplied with a create or update.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct OgpPayload {
    #[serde(default)]
    #[validate(length(max = 300))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 2048))]
    pub image: String,

    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
}

impl From<OgpPayload> for OgpFields {
    fn from(p: OgpPayload) -> Self {
        Self {
            title: p.title,
            image: p.image,
            description: p.description,
        }
    }
}

/// Request body for `POST /api/pages`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePageRequest {
    /// Destination URL (absolute http or https).
    #[validate(length(min = 1, max = 2048, message = "URL must be 1 to 2048 characters"))]
    pub url: String,

    #[validate(nested)]
    pub ogp: Option<OgpPayload>,
}

/// Request body for `PATCH /api/pages/{id}`.
///
/// The URL is always replaced. `ogp` describes the desired end state: present
/// creates or updates the page's OGP record, absent or `null` removes it.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePageRequest {
    #[validate(length(min = 1, max = 2048, message = "URL must be 1 to 2048 characters"))]
    pub url: String,

    #[serde(default)]
    #[validate(nested)]
    pub ogp: Option<OgpPayload>,
}

/// OGP metadata as returned by the API.
#[derive(Debug, Serialize)]
pub struct OgpResponse {
    pub id: i64,
    pub title: String,
    pub image: String,
    pub description: String,
}

impl From<Ogp> for OgpResponse {
    fn from(o: Ogp) -> Self {
        Self {
            id: o.id,
            title: o.title,
            image: o.image,
            description: o.description,
        }
    }
}

/// A page as returned by the API.
#[derive(Debug, Serialize)]
pub struct PageResponse {
    pub id: i64,
    pub slug: String,
    /// Path of the short link on this host, e.g. `/abc123`.
    pub short_path: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub ogp: Option<OgpResponse>,
}

impl From<Page> for PageResponse {
    fn from(p: Page) -> Self {
        Self {
            id: p.id,
            short_path: format!("/{}", p.slug),
            slug: p.slug,
            url: p.url,
            created_at: p.created_at,
            ogp: p.ogp.map(OgpResponse::from),
        }
    }
}

/// Response for `GET /api/pages`.
#[derive(Debug, Serialize)]
pub struct PageListResponse {
    pub total: usize,
    pub items: Vec<PageResponse>,
}
