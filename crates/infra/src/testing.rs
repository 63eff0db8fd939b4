//! Scripted invoker for tests
//!
//! Replays a fixed list of envelopes (or errors) in order and records every
//! call it receives, including the instant it was invoked. Timing assertions
//! rely on tokio's paused clock, so instants come from [`tokio::time`].

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::time::Instant;
use vkclient_domain::{Params, VkError};

use crate::api::invoker::RemoteInvoker;

/// One call observed by a [`ScriptedInvoker`]
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: String,
    pub params: Params,
    pub at: Instant,
}

impl RecordedCall {
    /// Integer parameter sent with this call, if present.
    pub fn param_u64(&self, name: &str) -> Option<u64> {
        self.params.get(name).and_then(Value::as_u64)
    }
}

#[derive(Debug, Default)]
pub struct ScriptedInvoker {
    script: Mutex<VecDeque<Result<Value, VkError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw envelope.
    #[must_use]
    pub fn respond(self, envelope: Value) -> Self {
        self.script.lock().push_back(Ok(envelope));
        self
    }

    /// Queue a `{"response": {"count": .., "items": [..]}}` page.
    #[must_use]
    pub fn page(self, items: Vec<Value>, total: Option<u64>) -> Self {
        let mut response = json!({ "items": items });
        if let Some(total) = total {
            response["count"] = json!(total);
        }
        self.respond(json!({ "response": response }))
    }

    /// Queue a transport-level failure.
    #[must_use]
    pub fn fail(self, error: VkError) -> Self {
        self.script.lock().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl RemoteInvoker for ScriptedInvoker {
    async fn invoke(&self, method: &str, params: &Params) -> Result<Value, VkError> {
        self.calls.lock().push(RecordedCall {
            method: method.to_string(),
            params: params.clone(),
            at: Instant::now(),
        });

        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(VkError::Transport("scripted invoker ran out of responses".into())))
    }
}
