// Shared test helpers: scripted transport and document lookups

#![allow(dead_code)]

use async_trait::async_trait;
use energy_dashboard::dom::{Document, NodeId, Selector};
use energy_dashboard::error::ApiError;
use energy_dashboard::transport::{Endpoint, Transport};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// One scripted reply: wait `delay`, then return `result`.
#[derive(Clone)]
pub struct Reply {
    pub delay: Duration,
    pub result: Result<Value, ApiError>,
}

impl Reply {
    pub fn ok(value: Value) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(value),
        }
    }

    pub fn err(error: ApiError) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(error),
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Transport answering from per-path scripts. Each path replays its queue in order
/// and then keeps returning the last reply.
#[derive(Default)]
pub struct StubTransport {
    scripts: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<(String, Instant)>>,
    posts: Mutex<Vec<(String, Value)>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, endpoint: &Endpoint, replies: Vec<Reply>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(endpoint.path(), replies.into());
        self
    }

    pub fn respond(self, endpoint: &Endpoint, reply: Reply) -> Self {
        self.script(endpoint, vec![reply])
    }

    /// Times of every request to `endpoint`, in call order.
    pub fn call_times(&self, endpoint: &Endpoint) -> Vec<Instant> {
        let path = endpoint.path();
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| *p == path)
            .map(|(_, t)| *t)
            .collect()
    }

    pub fn posts(&self) -> Vec<(String, Value)> {
        self.posts.lock().unwrap().clone()
    }

    async fn answer(&self, endpoint: &Endpoint) -> Result<Value, ApiError> {
        let path = endpoint.path();
        self.calls
            .lock()
            .unwrap()
            .push((path.clone(), Instant::now()));
        let reply = {
            let mut scripts = self.scripts.lock().unwrap();
            match scripts.get_mut(&path) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };
        let Some(reply) = reply else {
            return Err(ApiError::Status(404));
        };
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.result
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn get_json(&self, endpoint: &Endpoint) -> Result<Value, ApiError> {
        self.answer(endpoint).await
    }

    async fn post_json(&self, endpoint: &Endpoint, body: &Value) -> Result<Value, ApiError> {
        self.posts
            .lock()
            .unwrap()
            .push((endpoint.path(), body.clone()));
        self.answer(endpoint).await
    }
}

pub fn sel(s: &str) -> Selector {
    s.parse().expect("valid selector")
}

pub fn find(doc: &Document, s: &str) -> NodeId {
    doc.query(&sel(s))
        .unwrap_or_else(|| panic!("no node for {s}"))
}

pub fn text_of(doc: &Document, s: &str) -> String {
    doc.text(find(doc, s)).unwrap_or_default().to_string()
}

pub fn classes_of(doc: &Document, id: NodeId) -> Vec<String> {
    doc.get(id).map(|el| el.classes.clone()).unwrap_or_default()
}
