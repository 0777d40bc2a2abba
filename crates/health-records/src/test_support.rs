//! Shared fixtures for record tests.

use crate::RecordsClient;
use session_client::testing::ScriptedTransport;
use session_client::SessionClient;
use std::sync::Arc;
use token_storage::in_memory_token_store;

pub struct Fixture {
    pub transport: Arc<ScriptedTransport>,
    pub records: RecordsClient,
}

/// A records client for user 7, signed in as `A1`/`R1`.
pub fn fixture() -> Fixture {
    let transport = Arc::new(ScriptedTransport::new());
    let session = SessionClient::new(in_memory_token_store(), transport.clone());
    session.set_tokens("A1", "R1").unwrap();

    Fixture {
        transport,
        records: RecordsClient::new(Arc::new(session), "7"),
    }
}
