//! Cache-related MCP tools.
//!
//! This module provides tools for inspecting the current cache generation
//! without going through the caching strategies.

pub mod generations;
pub mod get;
pub mod remove;

pub use generations::generations_impl;
pub use get::{CacheGetParams, get_impl};
pub use remove::{CacheRemoveParams, remove_impl};
