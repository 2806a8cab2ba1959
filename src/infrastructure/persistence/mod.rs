//! Durable store implementations.
//!
//! PostgreSQL repositories use SQLx with runtime-checked queries. The
//! [`InMemoryStore`] implements every repository trait for unit and integration
//! tests.
//!
//! # Repositories
//!
//! - [`PgPageRepository`] - Pages joined with their OGP record
//! - [`PgOgpRepository`] - OGP preview metadata
//! - [`PgPageViewRepository`] - Visit analytics
//! - [`PgTokenRepository`] - Users and API token validation
//! - [`InMemoryStore`] - All of the above, in memory

pub mod memory;
pub mod pg_ogp_repository;
pub mod pg_page_repository;
pub mod pg_page_view_repository;
pub mod pg_token_repository;

pub use memory::InMemoryStore;
pub use pg_ogp_repository::PgOgpRepository;
pub use pg_page_repository::PgPageRepository;
pub use pg_page_view_repository::PgPageViewRepository;
pub use pg_token_repository::PgTokenRepository;
