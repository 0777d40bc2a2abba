//! Scenario tests for the session client.
//!
//! - `harness.rs`      - scripted transport wiring and token fixtures
//! - `tokens.rs`       - token store lifecycle through the client
//! - `refresh.rs`      - refresh contract (absent, success, failure)
//! - `fetch.rs`        - authenticated fetch, header merge, 401 retry
//! - `single_flight.rs` - concurrent 401s share one refresh
//! - `lifecycle.rs`    - logout and current user outcomes
//! - `auth_flows.rs`   - login and registration

pub(crate) mod harness;
mod refresh;
mod single_flight;
