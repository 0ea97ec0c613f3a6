//! Response model.
//!
//! A [`Response`] is deliberately not `Clone`. A network body can be read
//! once, so any path that both stores and returns a response must call
//! [`Response::duplicate`] first; storing consumes the value it is given.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use url::Url;

/// Body text of the synthesized offline response.
pub const OFFLINE_BODY: &str = "This resource is unavailable offline.";

/// Where a response came from, relative to the application origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Same-origin network response.
    Basic,
    /// Cross-origin network response.
    Cors,
    /// Constructed locally, never from the network.
    Default,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Basic => "basic",
            ResponseType::Cors => "cors",
            ResponseType::Default => "default",
        }
    }
}

impl FromStr for ResponseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(ResponseType::Basic),
            "cors" => Ok(ResponseType::Cors),
            "default" => Ok(ResponseType::Default),
            other => Err(format!("unknown response type: {other}")),
        }
    }
}

/// A response handed back to the client application.
#[derive(Debug, PartialEq, Eq)]
pub struct Response {
    pub url: Url,
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub response_type: ResponseType,
    body: Bytes,
}

impl Response {
    pub fn new(
        url: Url, status: u16, status_text: impl Into<String>, headers: Vec<(String, String)>,
        response_type: ResponseType, body: Bytes,
    ) -> Self {
        Self { url, status, status_text: status_text.into(), headers, response_type, body }
    }

    /// The synthesized 503 returned when neither cache nor network can serve.
    pub fn offline(url: Url) -> Self {
        Self {
            url,
            status: 503,
            status_text: "Service Unavailable".to_string(),
            headers: vec![("content-type".to_string(), "text/plain; charset=utf-8".to_string())],
            response_type: ResponseType::Default,
            body: Bytes::from_static(OFFLINE_BODY.as_bytes()),
        }
    }

    /// Status in the 2xx range.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Produce an independent copy; must happen before the body is consumed.
    pub fn duplicate(&self) -> Self {
        Self {
            url: self.url.clone(),
            status: self.status,
            status_text: self.status_text.clone(),
            headers: self.headers.clone(),
            response_type: self.response_type,
            body: self.body.clone(),
        }
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Consume the response, yielding its body.
    pub fn into_body(self) -> Bytes {
        self.body
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }
}
