//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence and caching.
//!
//! # Modules
//!
//! - [`cache`] - Slug cache (Redis, in-process moka, no-op)
//! - [`persistence`] - PostgreSQL repositories and the in-memory store

pub mod cache;
pub mod persistence;
