// Scripted transport shared by the integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use admin_console::api::{ApiRequest, ApiResponse, Transport};
use admin_console::error::TransportError;
use serde_json::{Value, json};
use tokio::sync::oneshot;

pub const ID_A: &str = "65f0c0ffee0000000000000a";
pub const ID_B: &str = "65f0c0ffee0000000000000b";
pub const ID_C: &str = "65f0c0ffee0000000000000c";

pub enum Step {
    Reply(ApiResponse),
    /// No response at all (connection refused, timeout).
    Fail,
    /// Held until the test sends the response.
    Gated(oneshot::Receiver<ApiResponse>),
}

/// Answers requests from a queue, in order, and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Step>>,
    log: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, step: Step) {
        self.script.lock().unwrap().push_back(step);
    }

    pub fn reply(&self, status: u16, body: Value) {
        self.push(Step::Reply(ApiResponse::new(status, Some(body))));
    }

    pub fn fail(&self) {
        self.push(Step::Fail);
    }

    /// Queue a response the test releases later through the returned sender.
    pub fn gate(&self) -> oneshot::Sender<ApiResponse> {
        let (tx, rx) = oneshot::channel();
        self.push(Step::Gated(rx));
        tx
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().unwrap().clone()
    }

    pub fn request_lines(&self) -> Vec<String> {
        self.requests().iter().map(|r| format!("{} {}", r.method.as_str(), r.path)).collect()
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }

    /// Yield until at least `n` requests have been sent.
    pub async fn wait_for_requests(&self, n: usize) {
        while self.log.lock().unwrap().len() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.log.lock().unwrap().push(request);
        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(Step::Reply(resp)) => Ok(resp),
            Some(Step::Fail) => Err(TransportError::Other("connection refused".into())),
            Some(Step::Gated(rx)) => rx.await.map_err(|_| TransportError::Other("gate dropped".into())),
            None => Err(TransportError::Other("no scripted response".into())),
        }
    }
}

pub fn list(items: Value) -> Value {
    json!({ "success": true, "data": items })
}

pub fn role(id: &str, name: &str) -> Value {
    json!({ "_id": id, "name": name, "codeId": format!("R-{name}"), "departmentDesignation": "Finance" })
}

pub fn admin(id: &str, name: &str, email: &str) -> Value {
    json!({ "_id": id, "name": name, "email": email, "type": "admin" })
}
