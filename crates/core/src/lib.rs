//! Core types and shared functionality for harbor.
//!
//! This crate provides:
//! - Request/response model and the network [`Transport`] seam
//! - Strategy table and request classification
//! - Versioned cache generations with a SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod policy;
pub mod request;
pub mod response;
pub mod transport;

pub use cache::{CacheDb, CacheStore, CachedEntry, GenerationManager, RequestKey};
pub use error::Error;
pub use request::{CacheMode, Request, RequestMode};
pub use response::{Response, ResponseType};
pub use transport::Transport;
