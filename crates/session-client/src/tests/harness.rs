//! Test harness: a `SessionClient` over an in-memory store and a scripted transport.

use crate::testing::ScriptedTransport;
use crate::{Method, SessionClient, REFRESH_PATH};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use token_storage::in_memory_token_store;

pub const PROTECTED: &str = "/api/user/1/treatments";

pub struct Harness {
    pub transport: Arc<ScriptedTransport>,
    pub client: Arc<SessionClient>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_transport(ScriptedTransport::new())
    }

    /// Every scripted send takes `latency`, letting concurrent calls interleave.
    pub fn with_latency(latency: Duration) -> Self {
        Self::with_transport(ScriptedTransport::new().with_latency(latency))
    }

    fn with_transport(transport: ScriptedTransport) -> Self {
        let transport = Arc::new(transport);
        let client = SessionClient::new(in_memory_token_store(), transport.clone());
        Self {
            transport,
            client: Arc::new(client),
        }
    }

    pub fn signed_in(self, access: &str, refresh: &str) -> Self {
        self.client.set_tokens(access, refresh).unwrap();
        self
    }

    pub fn script(&self, method: Method, route: &str, status: u16, body: serde_json::Value) {
        self.transport.respond_json(method, route, status, body);
    }

    pub fn refresh_succeeds(&self, new_access: &str) {
        self.script(
            Method::GET,
            REFRESH_PATH,
            200,
            json!({ "access_token": new_access }),
        );
    }

    pub fn refresh_rejected(&self) {
        self.script(
            Method::GET,
            REFRESH_PATH,
            401,
            json!({ "msg": "Token has expired" }),
        );
    }

    pub fn access(&self) -> Option<String> {
        self.client.access_token().unwrap()
    }

    pub fn refresh(&self) -> Option<String> {
        self.client.refresh_token().unwrap()
    }

    pub fn bearers_to(&self, route: &str) -> Vec<String> {
        self.transport
            .requests_to(route)
            .iter()
            .map(|r| r.bearer_token().unwrap_or_default().to_string())
            .collect()
    }
}
