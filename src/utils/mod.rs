//! Utility functions for slug generation and request inspection.
//!
//! - [`slug_generator`] - Short slug generation
//! - [`user_agent`] - Crawler detection and visitor attributes
//! - [`client_ip`] - Client IP resolution behind proxies
//! - [`db_error`] - Database error classification

pub mod client_ip;
pub mod db_error;
pub mod slug_generator;
pub mod user_agent;
