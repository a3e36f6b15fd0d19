use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use crate::core::{ApiRequest, HttpTransport, RawResponse};
use crate::error::{Result, SpongeError};

/// A canned answer for [`MockTransport`].
#[derive(Debug, Clone)]
pub enum MockResponse {
    Reply(RawResponse),
    /// Simulated network failure
    Fail(String),
}

impl MockResponse {
    pub fn json(status: u16, body: &Value) -> Self {
        Self::Reply(RawResponse::new(status, body.to_string()))
    }

    pub fn ok(body: &Value) -> Self {
        Self::json(200, body)
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self::Reply(RawResponse::new(status, body))
    }

    pub fn transport_error(message: &str) -> Self {
        Self::Fail(message.to_string())
    }
}

/// Shared control surface of a [`MockTransport`]: queue responses, inspect requests.
#[derive(Debug, Default)]
pub struct MockHandle {
    responses: Mutex<VecDeque<MockResponse>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockHandle {
    pub fn push(&self, response: MockResponse) {
        lock(&self.responses).push_back(response);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        lock(&self.requests).clone()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        lock(&self.requests).last().cloned()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

// A panicking test thread must not hide the recorded state from the others.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Transport that records requests and replays queued responses in order.
#[derive(Debug, Clone)]
pub struct MockTransport {
    handle: Arc<MockHandle>,
}

impl MockTransport {
    pub fn new() -> (Self, Arc<MockHandle>) {
        let handle = Arc::new(MockHandle::default());
        (Self { handle: handle.clone() }, handle)
    }

    pub fn with_responses(responses: Vec<MockResponse>) -> (Self, Arc<MockHandle>) {
        let (transport, handle) = Self::new();
        for response in responses {
            handle.push(response);
        }
        (transport, handle)
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get(&self, request: &ApiRequest) -> Result<RawResponse> {
        lock(&self.handle.requests).push(request.clone());
        let next = lock(&self.handle.responses).pop_front();
        match next {
            Some(MockResponse::Reply(response)) => Ok(response),
            Some(MockResponse::Fail(message)) => Err(SpongeError::Transport(message)),
            None => Err(SpongeError::Transport("mock transport has no queued response".to_string())),
        }
    }
}
