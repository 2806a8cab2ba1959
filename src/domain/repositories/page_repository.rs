//! Repository trait for page data access.

use crate::domain::entities::{NewPage, OgpFields, Page};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for pages.
///
/// Lookups return the page joined with its OGP record when one exists.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgPageRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStore`] - In-memory implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageRepository: Send + Sync {
    /// Persists a new page and, if given, its OGP record in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the slug is already taken.
    /// Returns [`AppError::Internal`] on database errors. Nothing is stored.
    async fn create(&self, new_page: NewPage) -> Result<Page, AppError>;

    /// Finds a page by its slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Page>, AppError>;

    /// Finds a page by its id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Page>, AppError>;

    /// Lists pages owned by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Page>, AppError>;

    /// Replaces the destination URL and reconciles the OGP record in one
    /// transaction, returning the page as stored afterwards.
    ///
    /// `Some` creates the record or updates it in place (the id is kept),
    /// `None` deletes it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no page has this id.
    /// Returns [`AppError::Internal`] on database errors. Nothing is changed.
    async fn update(
        &self,
        id: i64,
        url: &str,
        ogp: Option<OgpFields>,
    ) -> Result<Page, AppError>;

    /// Counts all pages.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;
}
