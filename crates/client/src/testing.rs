//! Test doubles shared by the router and worker tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use harbor_core::{Error, Request, Response, ResponseType, Transport};
use url::Url;

pub const SCOPE: &str = "https://app.test/";
pub const SHELL: &str = "https://app.test/index.html";

#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16, &'static str, ResponseType),
}

/// In-process origin with canned replies; unknown URLs are unreachable.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<Request>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, url: &str, reply: Reply) -> &Self {
        self.replies.lock().unwrap().insert(url.to_string(), reply);
        self
    }

    /// Same-origin 200 with `body`.
    pub fn serve(&self, url: &str, body: &'static str) -> &Self {
        self.reply(url, Reply::Status(200, body, ResponseType::Basic))
    }

    pub fn go_offline(&self) {
        self.replies.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<Request> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|r| r.url.as_str() == url).count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        self.calls.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().get(request.url.as_str()).cloned();
        match reply {
            Some(Reply::Status(status, body, response_type)) => Ok(Response::new(
                request.url.clone(),
                status,
                "",
                vec![("content-type".into(), "text/plain".into())],
                response_type,
                Bytes::from(body),
            )),
            None => Err(Error::Network(format!("{} unreachable", request.url))),
        }
    }
}

pub fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}
