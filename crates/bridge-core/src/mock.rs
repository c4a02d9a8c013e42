//! In-memory backend for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{BridgeError, Result};
use crate::request::BackendRequest;
use crate::traits::{Backend, BackendResponse};

/// Backend that replays queued responses and records every request.
///
/// When the queue is empty, calls fail with `BackendUnavailable`.
#[derive(Debug, Default)]
pub struct MockBackend {
    replies: Mutex<VecDeque<Result<BackendResponse>>>,
    requests: Mutex<Vec<BackendRequest>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON reply with the given status.
    pub fn reply_json(self, status: u16, body: Value) -> Self {
        self.push(Ok(BackendResponse::new(status, body.to_string())))
    }

    /// Queue a raw text reply.
    pub fn reply_text(self, status: u16, body: impl Into<String>) -> Self {
        self.push(Ok(BackendResponse::new(status, body)))
    }

    /// Queue a transport failure.
    pub fn reply_error(self, error: BridgeError) -> Self {
        self.push(Err(error))
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<BackendRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn push(self, reply: Result<BackendResponse>) -> Self {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
        self
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn send(&self, request: BackendRequest) -> Result<BackendResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        self.replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front())
            .unwrap_or_else(|| Err(BridgeError::backend_unavailable("no reply queued")))
    }
}
