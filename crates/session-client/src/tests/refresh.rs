//! Explicit refresh outcomes.

use super::harness::Harness;
use crate::{Method, REFRESH_PATH};
use serde_json::json;

#[tokio::test]
async fn test_refresh_without_refresh_token_makes_no_request() {
    let h = Harness::new();

    assert_eq!(h.client.refresh_access_token().await, None);
    assert!(h.transport.requests().is_empty());
}

#[tokio::test]
async fn test_refresh_success_replaces_only_access_token() {
    let h = Harness::new().signed_in("A1", "R1");
    h.refresh_succeeds("A2");

    assert_eq!(h.client.refresh_access_token().await.as_deref(), Some("A2"));
    assert_eq!(h.access().as_deref(), Some("A2"));
    assert_eq!(h.refresh().as_deref(), Some("R1"));
    assert_eq!(h.bearers_to(REFRESH_PATH), vec!["R1"]);
}

#[tokio::test]
async fn test_refresh_failure_status_clears_both_tokens() {
    let h = Harness::new().signed_in("A1", "R1");
    h.refresh_rejected();

    assert_eq!(h.client.refresh_access_token().await, None);
    assert_eq!(h.access(), None);
    assert_eq!(h.refresh(), None);
    assert!(!h.client.is_authenticated().unwrap());
}

#[tokio::test]
async fn test_refresh_transport_error_clears_both_tokens() {
    let h = Harness::new().signed_in("A1", "R1");
    h.transport
        .fail(Method::GET, REFRESH_PATH, "connection refused");

    assert_eq!(h.client.refresh_access_token().await, None);
    assert!(!h.client.is_authenticated().unwrap());
    assert_eq!(h.refresh(), None);
}

#[tokio::test]
async fn test_refresh_unreadable_body_clears_both_tokens() {
    let h = Harness::new().signed_in("A1", "R1");
    h.script(Method::GET, REFRESH_PATH, 200, json!({ "token": "A2" }));

    assert_eq!(h.client.refresh_access_token().await, None);
    assert!(!h.client.is_authenticated().unwrap());
}

#[tokio::test]
async fn test_sequential_refreshes_each_reach_the_server() {
    let h = Harness::new().signed_in("A1", "R1");
    h.refresh_succeeds("A2");
    h.refresh_succeeds("A3");

    assert_eq!(h.client.refresh_access_token().await.as_deref(), Some("A2"));
    assert_eq!(h.client.refresh_access_token().await.as_deref(), Some("A3"));
    assert_eq!(h.bearers_to(REFRESH_PATH), vec!["R1", "R1"]);
    assert_eq!(h.access().as_deref(), Some("A3"));
}
