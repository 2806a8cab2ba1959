//! Domain layer containing business entities and store contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Durable store trait definitions
//! - [`view_event`] - Page view event model
//! - [`view_worker`] - Asynchronous page view persistence
//!
//! # Page View Flow
//!
//! 1. The redirect engine resolves a slug
//! 2. For non-crawler visitors a [`view_event::PageViewEvent`] is sent to a bounded channel
//! 3. [`view_worker::run_view_worker`] persists it via [`repositories::PageViewRepository`]

pub mod entities;
pub mod repositories;
pub mod view_event;
pub mod view_worker;
