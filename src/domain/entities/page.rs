//! Page entity representing a slug to destination URL mapping.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ogp::{Ogp, OgpFields};

/// A shortened page owned by a single user.
///
/// The slug is assigned on creation and never changes. The destination URL
/// can be replaced by the owner. `ogp` is populated by repository lookups that
/// join the optional preview metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub id: i64,
    pub slug: String,
    pub user_id: i64,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub ogp: Option<Ogp>,
}

impl Page {
    /// Creates a new Page instance without preview metadata.
    pub fn new(id: i64, slug: String, user_id: i64, url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            slug,
            user_id,
            url,
            created_at,
            ogp: None,
        }
    }

    /// Attaches preview metadata.
    pub fn with_ogp(mut self, ogp: Option<Ogp>) -> Self {
        self.ogp = ogp;
        self
    }

    /// Returns true if `user_id` owns this page.
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

/// Input data for persisting a new page, with its OGP record if any.
#[derive(Debug, Clone)]
pub struct NewPage {
    pub slug: String,
    pub user_id: i64,
    pub url: String,
    pub ogp: Option<OgpFields>,
}
