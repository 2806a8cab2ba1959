//! Application layer services implementing business logic.
//!
//! Services consume repository and cache traits and give the HTTP handlers a
//! small API that already enforces ownership, validation and cache ordering.
//!
//! # Available Services
//!
//! - [`services::redirect_service::RedirectService`] - Slug resolution and page view capture
//! - [`services::page_service::PageService`] - Page creation, updates and owner-scoped reads
//! - [`services::auth_service::AuthService`] - API token authentication

pub mod services;
