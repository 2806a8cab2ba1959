//! Repository trait definitions for the domain layer.
//!
//! These traits are the durable store contracts. Implementations live in
//! `crate::infrastructure::persistence`; mocks are generated with `mockall`
//! for unit tests.
//!
//! # Available Repositories
//!
//! - [`PageRepository`] - Pages and their slugs
//! - [`OgpRepository`] - Preview metadata
//! - [`PageViewRepository`] - Visit analytics
//! - [`TokenRepository`] - Users and API tokens

pub mod ogp_repository;
pub mod page_repository;
pub mod page_view_repository;
pub mod token_repository;

pub use ogp_repository::OgpRepository;
pub use page_repository::PageRepository;
pub use page_view_repository::PageViewRepository;
pub use token_repository::{ApiToken, TokenRepository};

#[cfg(test)]
pub use ogp_repository::MockOgpRepository;
#[cfg(test)]
pub use page_repository::MockPageRepository;
#[cfg(test)]
pub use page_view_repository::MockPageViewRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
