//! Page view entity recorded for each non-crawler redirect.

use chrono::{DateTime, Utc};

/// A single recorded visit to a slug.
#[derive(Debug, Clone)]
pub struct PageView {
    pub id: i64,
    pub slug: String,
    pub real_ip: Option<String>,
    pub referer: Option<String>,
    pub mobile: bool,
    pub platform: Option<String>,
    pub os: Option<String>,
    pub browser_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input data for recording a page view.
///
/// The timestamp is assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPageView {
    pub slug: String,
    pub real_ip: Option<String>,
    pub referer: Option<String>,
    pub mobile: bool,
    pub platform: Option<String>,
    pub os: Option<String>,
    pub browser_name: Option<String>,
}
