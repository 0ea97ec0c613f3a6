//! Client code for harbor.
//!
//! This crate provides the reqwest transport, the request router that
//! applies caching strategies, and the offline worker that exposes the
//! lifecycle hooks to a host runtime.

pub mod fetch;
pub mod router;
pub mod worker;

#[cfg(test)]
mod testing;

pub use fetch::{FetchClient, FetchConfig};
pub use router::{ResponseSource, Router, RouterOptions, Served};
pub use worker::{ClientHost, LocalHost, Notification, OfflineWorker, SyncOutcome};
