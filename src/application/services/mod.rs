//! Business logic services for the application layer.

pub mod auth_service;
pub mod page_service;
pub mod redirect_service;

pub use auth_service::{AuthService, AuthenticatedUser, hash_token};
pub use page_service::PageService;
pub use redirect_service::{RedirectOutcome, RedirectService, Visitor};
