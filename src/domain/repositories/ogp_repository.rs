//! Repository trait for OGP preview metadata.

use crate::domain::entities::Ogp;
use crate::error::AppError;
use async_trait::async_trait;

/// Read access to OGP records by id.
///
/// Records are written together with their page through
/// [`crate::domain::repositories::PageRepository`], so a page and its preview
/// metadata always change in one store operation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OgpRepository: Send + Sync {
    /// Finds an OGP record by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Ogp>, AppError>;
}
