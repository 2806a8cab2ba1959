//! Repository trait for page view analytics.

use crate::domain::entities::{NewPageView, PageView};
use crate::error::AppError;
use async_trait::async_trait;

/// Append-only store of page views.
///
/// Written by [`crate::domain::view_worker::run_view_worker`]; the redirect
/// path never reads it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageViewRepository: Send + Sync {
    /// Records a page view.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn record(&self, new_view: NewPageView) -> Result<PageView, AppError>;

    /// Counts recorded views for a slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_by_slug(&self, slug: &str) -> Result<i64, AppError>;
}
