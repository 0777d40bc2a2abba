//! Scripted transport for tests.
//!
//! Responses are queued per method and route (path without query) and
//! replayed in order. Every request is recorded, including ones that found
//! no scripted response.

use crate::{ApiRequest, ApiResponse, HttpTransport, SessionError, SessionResult};
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

enum Scripted {
    Respond(ApiResponse),
    Fail(String),
}

/// In-memory [`HttpTransport`] that replays queued responses.
#[derive(Default)]
pub struct ScriptedTransport {
    queues: Mutex<HashMap<(Method, String), VecDeque<Scripted>>>,
    requests: Mutex<Vec<ApiRequest>>,
    latency: Option<Duration>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every `send`, so concurrent callers interleave.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queue a response for `method route`.
    pub fn respond(&self, method: Method, route: &str, response: ApiResponse) {
        self.push(method, route, Scripted::Respond(response));
    }

    /// Queue a JSON response for `method route`.
    pub fn respond_json(&self, method: Method, route: &str, status: u16, body: Value) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self.respond(method, route, ApiResponse::from_json(status, &body));
    }

    /// Queue a transport failure for `method route`.
    pub fn fail(&self, method: Method, route: &str, message: &str) {
        self.push(method, route, Scripted::Fail(message.to_string()));
    }

    fn push(&self, method: Method, route: &str, scripted: Scripted) {
        self.queues
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry((method, route.to_string()))
            .or_default()
            .push_back(scripted);
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Requests sent to `route`, any method.
    pub fn requests_to(&self, route: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.route() == route)
            .collect()
    }

    /// Scripted responses not yet consumed.
    pub fn pending(&self) -> usize {
        self.queues
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .values()
            .map(VecDeque::len)
            .sum()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> SessionResult<ApiResponse> {
        let key = (request.method.clone(), request.route().to_string());
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let next = self
            .queues
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get_mut(&key)
            .and_then(VecDeque::pop_front);

        match next {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail(message)) => Err(SessionError::Transport(message)),
            None => Err(SessionError::Transport(format!(
                "no scripted response for {} {}",
                key.0, key.1
            ))),
        }
    }
}
