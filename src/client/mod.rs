//! Client module for tatsu.
//!
//! This module provides the high-level client that decodes Tatsu API
//! responses into typed models.

pub mod api;

pub use api::{Client, RANKINGS_PAGE_SIZE};
