//! Authenticated session layer for the Med Assist API.
//!
//! This crate provides:
//! - **`SessionClient`**: token lifecycle, `authenticated_fetch` with a single
//!   401-driven refresh-and-retry, single-flight refresh, logout, current user
//! - **Sign-in flows**: email/username login and registration
//! - **`HttpTransport`**: the request seam, with a reqwest implementation
//!
//! Session state is never cached: it is derived from the injected
//! [`TokenStore`](token_storage::TokenStore) on every call.

mod auth;
mod error;
mod request;
mod session;
mod transport;
mod user;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

#[cfg(test)]
mod tests;

pub use auth::Registration;
pub use error::{SessionError, SessionResult};
pub use request::{ApiRequest, ApiResponse};
pub use session::{
    CurrentUser, LogoutOutcome, SessionClient, CURRENT_USER_PATH, LOGOUT_PATH, REFRESH_PATH,
};
pub use transport::{HttpTransport, ReqwestTransport};
pub use user::UserRecord;

pub use reqwest::{Method, StatusCode};
