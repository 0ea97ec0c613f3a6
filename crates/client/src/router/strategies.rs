use harbor_core::{Error, Request, Response, ResponseType};

use super::{ResponseSource, Router};

type Outcome = Result<(Response, ResponseSource), Error>;

/// Write-through eligibility: exactly 200, and same-origin unless the
/// caller allows cross-origin responses.
fn is_cacheable(response: &Response, allow_cross_origin: bool) -> bool {
    if response.status != 200 {
        return false;
    }
    match response.response_type {
        ResponseType::Basic => true,
        ResponseType::Cors => allow_cross_origin,
        ResponseType::Default => false,
    }
}

/// Only GET requests are read from or written to the cache.
fn is_cacheable_method(request: &Request) -> bool {
    request.method.eq_ignore_ascii_case("GET")
}

impl Router {
    /// Network first; the cache is consulted only after a network failure.
    pub(super) async fn network_first(&self, request: &Request) -> Outcome {
        match self.transport.fetch(request).await {
            Ok(response) => {
                if self.options.cache_cross_origin_successes && is_cacheable(&response, true) {
                    let copy = response.duplicate();
                    self.write_through(request, copy).await;
                }
                Ok((response, ResponseSource::Network))
            }
            Err(err) => {
                tracing::debug!(url = %request.url, error = %err, "network failed, trying cache");
                if let Some(response) = self.lookup(request).await {
                    return Ok((response, ResponseSource::Cache));
                }
                self.fallback(request, err, false).await
            }
        }
    }

    /// Cache first; on a miss fetch and write through.
    ///
    /// `refresh` selects the pinned-resource variant: cross-origin responses
    /// are cacheable and every failure falls back to the shell document.
    pub(super) async fn cache_first(&self, request: &Request, refresh: bool) -> Outcome {
        if let Some(response) = self.lookup(request).await {
            return Ok((response, ResponseSource::Cache));
        }

        match self.transport.fetch(request).await {
            Ok(response) => {
                if is_cacheable(&response, refresh) {
                    let copy = response.duplicate();
                    self.write_through(request, copy).await;
                }
                Ok((response, ResponseSource::Network))
            }
            Err(err) => self.fallback(request, err, refresh).await,
        }
    }

    /// Shell document for navigations (or any request when `shell_for_all`),
    /// then the synthesized 503, then the original error.
    async fn fallback(&self, request: &Request, err: Error, shell_for_all: bool) -> Outcome {
        if request.is_navigation() || shell_for_all {
            if let Some(shell) = self.lookup(&self.options.shell).await {
                return Ok((shell, ResponseSource::Shell));
            }
            tracing::warn!(shell = %self.options.shell.url, "shell document missing from cache");
        }

        if request.is_navigation() || self.options.synthesize_offline_response {
            return Ok((Response::offline(request.url.clone()), ResponseSource::Offline));
        }

        Err(err)
    }

    /// Current-generation lookup; store errors count as a miss.
    async fn lookup(&self, request: &Request) -> Option<Response> {
        if !is_cacheable_method(request) {
            return None;
        }
        let key = self.generations.key_for(request);
        let entry = match self.generations.lookup(&key).await {
            Ok(entry) => entry?,
            Err(err) => {
                tracing::warn!(url = %request.url, error = %err, "cache lookup failed");
                return None;
            }
        };
        match entry.to_response() {
            Ok(response) => Some(response),
            Err(err) => {
                tracing::warn!(url = %request.url, error = %err, "unreadable cache entry");
                None
            }
        }
    }

    async fn write_through(&self, request: &Request, copy: Response) {
        if !is_cacheable_method(request) {
            tracing::debug!(method = %request.method, url = %request.url, "not caching non-GET response");
            return;
        }
        if let Err(err) = self.generations.store(request, copy).await {
            tracing::warn!(url = %request.url, error = %err, "write-through failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use url::Url;

    fn response(status: u16, response_type: ResponseType) -> Response {
        Response::new(Url::parse("https://app.test/").unwrap(), status, "", Vec::new(), response_type, Bytes::new())
    }

    #[test]
    fn test_cacheable_requires_exact_200() {
        assert!(is_cacheable(&response(200, ResponseType::Basic), false));
        assert!(!is_cacheable(&response(201, ResponseType::Basic), false));
        assert!(!is_cacheable(&response(304, ResponseType::Basic), false));
        assert!(!is_cacheable(&response(404, ResponseType::Basic), true));
    }

    #[test]
    fn test_cacheable_cross_origin_only_when_allowed() {
        assert!(!is_cacheable(&response(200, ResponseType::Cors), false));
        assert!(is_cacheable(&response(200, ResponseType::Cors), true));
    }

    #[test]
    fn test_only_get_is_cacheable_method() {
        let get = Request::get(Url::parse("https://app.test/api").unwrap());
        assert!(is_cacheable_method(&get));
        assert!(is_cacheable_method(&Request { method: "get".into(), ..get.clone() }));
        assert!(!is_cacheable_method(&Request { method: "POST".into(), ..get.clone() }));
        assert!(!is_cacheable_method(&Request { method: "HEAD".into(), ..get }));
    }

    #[test]
    fn test_synthesized_never_cacheable() {
        assert!(!is_cacheable(&response(200, ResponseType::Default), true));
    }
}
