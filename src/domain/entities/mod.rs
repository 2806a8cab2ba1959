//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without business logic.
//!
//! # Entity Types
//!
//! - [`Page`] - A slug mapped to a destination URL
//! - [`Ogp`] - Optional social-preview metadata for a page
//! - [`PageView`] - One recorded visit
//! - [`User`] - Owner of pages and API tokens
//!
//! Creation inputs live in separate `New*` structs.

pub mod ogp;
pub mod page;
pub mod page_view;
pub mod user;

pub use ogp::{Ogp, OgpFields};
pub use page::{NewPage, Page};
pub use page_view::{NewPageView, PageView};
pub use user::User;
