use url::{Origin, Url};

use super::RequestClass;
use crate::Request;

/// Assigns a [`RequestClass`] to each request.
#[derive(Debug, Clone)]
pub struct Classifier {
    origin: Origin,
    pinned_prefixes: Vec<String>,
}

impl Classifier {
    /// `scope` supplies the application origin; `pinned_prefixes` are absolute
    /// URL prefixes designated always-cache-first.
    pub fn new(scope: &Url, pinned_prefixes: Vec<String>) -> Self {
        Self { origin: scope.origin(), pinned_prefixes }
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn is_same_origin(&self, url: &Url) -> bool {
        url.origin() == self.origin
    }

    pub fn classify(&self, request: &Request) -> RequestClass {
        let url = request.url.as_str();
        if self.pinned_prefixes.iter().any(|p| !p.is_empty() && url.starts_with(p.as_str())) {
            return RequestClass::Pinned;
        }
        if !self.is_same_origin(&request.url) {
            return RequestClass::CrossOrigin;
        }
        RequestClass::SameOrigin
    }
}
