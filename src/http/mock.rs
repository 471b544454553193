//! Canned-response transport for tests.

use super::{HttpRequest, HttpResponse, Transport, TransportError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

type Reply = std::result::Result<HttpResponse, TransportError>;

/// Replays queued responses in order and records every request it sees.
#[derive(Default)]
pub(crate) struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_json(&self, status: u16, body: serde_json::Value) {
        self.replies.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub(crate) fn push_timeout(&self) {
        self.replies.lock().unwrap().push_back(Err(TransportError {
            message: "deadline elapsed".to_string(),
            timed_out: true,
        }));
    }

    /// Number of requests issued so far.
    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post_json(&self, request: HttpRequest) -> Reply {
        self.requests.lock().unwrap().push(request);
        self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(TransportError {
                message: "connection refused".to_string(),
                timed_out: false,
            })
        })
    }
}

/// Complete OpenAI embeddings reply carrying one vector.
pub(crate) fn openai_embedding_reply(vector: &[f32]) -> serde_json::Value {
    serde_json::json!({
        "object": "list",
        "data": [{"object": "embedding", "index": 0, "embedding": vector}],
        "model": "text-embedding-3-small",
        "usage": {"prompt_tokens": 3, "total_tokens": 3}
    })
}

/// Complete OpenAI chat completion reply with the given choice contents.
pub(crate) fn openai_chat_reply(contents: &[&str]) -> serde_json::Value {
    let choices: Vec<serde_json::Value> = contents
        .iter()
        .enumerate()
        .map(|(index, content)| {
            serde_json::json!({
                "index": index,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            })
        })
        .collect();

    serde_json::json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-3.5-turbo",
        "choices": choices
    })
}
