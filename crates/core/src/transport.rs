//! Network transport seam.

use async_trait::async_trait;

use crate::{Error, Request, Response};

/// Issues a request against the remote origin.
///
/// Any HTTP status counts as a response; `Err` means the network could not
/// produce one at all (DNS, connect, timeout, size limit).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response, Error>;
}
