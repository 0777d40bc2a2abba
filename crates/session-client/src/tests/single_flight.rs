//! Concurrent refreshes and writes that race an in-flight refresh.

use super::harness::{Harness, PROTECTED};
use crate::{ApiRequest, LogoutOutcome, Method, SessionError, StatusCode, LOGOUT_PATH, REFRESH_PATH};
use serde_json::json;
use std::time::Duration;

const LATENCY: Duration = Duration::from_millis(20);

#[tokio::test(start_paused = true)]
async fn test_concurrent_401s_share_one_refresh() {
    let h = Harness::with_latency(LATENCY).signed_in("A1", "R1");
    h.script(Method::GET, PROTECTED, 401, json!({}));
    h.script(Method::GET, PROTECTED, 401, json!({}));
    h.refresh_succeeds("A2");
    h.script(Method::GET, PROTECTED, 200, json!({ "n": 1 }));
    h.script(Method::GET, PROTECTED, 200, json!({ "n": 2 }));

    let (first, second) = tokio::join!(
        h.client.authenticated_fetch(ApiRequest::get(PROTECTED)),
        h.client.authenticated_fetch(ApiRequest::get(PROTECTED)),
    );

    assert_eq!(first.unwrap().status, StatusCode::OK);
    assert_eq!(second.unwrap().status, StatusCode::OK);
    assert_eq!(h.transport.requests_to(REFRESH_PATH).len(), 1);
    assert_eq!(h.bearers_to(PROTECTED), vec!["A1", "A1", "A2", "A2"]);
    assert_eq!(h.access().as_deref(), Some("A2"));
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_401s_share_a_failed_refresh() {
    let h = Harness::with_latency(LATENCY).signed_in("A1", "R1");
    h.script(Method::GET, PROTECTED, 401, json!({}));
    h.script(Method::GET, PROTECTED, 401, json!({}));
    h.refresh_rejected();

    let (first, second) = tokio::join!(
        h.client.authenticated_fetch(ApiRequest::get(PROTECTED)),
        h.client.authenticated_fetch(ApiRequest::get(PROTECTED)),
    );

    assert!(matches!(first, Err(SessionError::SessionExpired)));
    assert!(matches!(second, Err(SessionError::SessionExpired)));
    assert_eq!(h.transport.requests_to(REFRESH_PATH).len(), 1);
    assert!(!h.client.is_authenticated().unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_explicit_refreshes_share_one_request() {
    let h = Harness::with_latency(LATENCY).signed_in("A1", "R1");
    h.refresh_succeeds("A2");

    let results = futures_util::future::join_all(
        (0..4).map(|_| h.client.refresh_access_token()),
    )
    .await;

    assert!(results.iter().all(|r| r.as_deref() == Some("A2")));
    assert_eq!(h.transport.requests_to(REFRESH_PATH).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_spawned_callers_share_one_refresh() {
    let h = Harness::with_latency(LATENCY).signed_in("A1", "R1");
    for _ in 0..3 {
        h.script(Method::GET, PROTECTED, 401, json!({}));
    }
    h.refresh_succeeds("A2");
    for _ in 0..3 {
        h.script(Method::GET, PROTECTED, 200, json!({}));
    }

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let client = h.client.clone();
            tokio::spawn(async move {
                client.authenticated_fetch(ApiRequest::get(PROTECTED)).await
            })
        })
        .collect();

    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert!(response.is_success());
    }
    assert_eq!(h.transport.requests_to(REFRESH_PATH).len(), 1);
    assert_eq!(h.transport.pending(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_logout_during_refresh_stays_signed_out() {
    let h = Harness::with_latency(LATENCY).signed_in("A1", "R1");
    h.script(Method::GET, PROTECTED, 401, json!({}));
    h.refresh_succeeds("A2");
    h.script(Method::GET, PROTECTED, 200, json!({}));
    h.script(Method::GET, LOGOUT_PATH, 200, json!({}));

    let (fetched, logged_out) = tokio::join!(
        h.client.authenticated_fetch(ApiRequest::get(PROTECTED)),
        async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            h.client.logout().await
        },
    );

    assert_eq!(logged_out.unwrap(), LogoutOutcome::Revoked);
    assert!(matches!(fetched, Err(SessionError::SessionExpired)));
    assert!(!h.client.is_authenticated().unwrap());
    assert_eq!(h.access(), None);
    assert_eq!(h.refresh(), None);
    assert_eq!(h.bearers_to(PROTECTED), vec!["A1"]);
}

#[tokio::test(start_paused = true)]
async fn test_sign_in_during_refresh_keeps_new_pair() {
    let h = Harness::with_latency(LATENCY).signed_in("A1", "R1");
    h.script(Method::GET, PROTECTED, 401, json!({}));
    h.refresh_succeeds("A2");

    let (fetched, ()) = tokio::join!(
        h.client.authenticated_fetch(ApiRequest::get(PROTECTED)),
        async {
            tokio::time::sleep(Duration::from_millis(25)).await;
            h.client.set_tokens("B1", "RB1").unwrap();
        },
    );

    assert!(matches!(fetched, Err(SessionError::SessionExpired)));
    assert_eq!(h.access().as_deref(), Some("B1"));
    assert_eq!(h.refresh().as_deref(), Some("RB1"));
    assert_eq!(h.bearers_to(PROTECTED), vec!["A1"]);
}

#[tokio::test(start_paused = true)]
async fn test_failed_refresh_does_not_clear_new_sign_in() {
    let h = Harness::with_latency(LATENCY).signed_in("A1", "R1");
    h.script(Method::GET, PROTECTED, 401, json!({}));
    h.refresh_rejected();

    let (fetched, ()) = tokio::join!(
        h.client.authenticated_fetch(ApiRequest::get(PROTECTED)),
        async {
            tokio::time::sleep(Duration::from_millis(25)).await;
            h.client.set_tokens("B1", "RB1").unwrap();
        },
    );

    assert!(matches!(fetched, Err(SessionError::SessionExpired)));
    assert_eq!(h.access().as_deref(), Some("B1"));
    assert_eq!(h.refresh().as_deref(), Some("RB1"));
}
