//! Session lifecycle and the authenticated request path.
//!
//! Every protected call goes through [`SessionClient::authenticated_fetch`],
//! which attaches the stored access token and, on a 401, refreshes it once
//! and re-sends the request once. Refreshes are single-flight: callers that
//! hit a 401 for the same access token wait on one in-flight refresh and
//! share its outcome instead of each spending the refresh token.

use crate::request::bearer_value;
use crate::{
    ApiRequest, ApiResponse, HttpTransport, ReqwestTransport, SessionError, SessionResult,
    UserRecord,
};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use token_storage::TokenStore;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

/// Token refresh endpoint, authenticated with the refresh token.
pub const REFRESH_PATH: &str = "/api/auth/refresh";
/// Server-side revocation endpoint, authenticated with the access token.
pub const LOGOUT_PATH: &str = "/api/auth/logout";
/// Current user endpoint.
pub const CURRENT_USER_PATH: &str = "/api/users/me";

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
}

/// Result of [`SessionClient::current_user`].
#[derive(Debug, Clone, PartialEq)]
pub enum CurrentUser {
    /// The server returned the user record.
    Authenticated(UserRecord),
    /// No session, or the session expired and could not be refreshed.
    SignedOut,
    /// A session exists but the user could not be fetched right now.
    Unavailable { reason: String },
}

impl CurrentUser {
    pub fn user(&self) -> Option<&UserRecord> {
        match self {
            CurrentUser::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Result of [`SessionClient::logout`]. Local tokens are cleared in every case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// The server acknowledged the revocation.
    Revoked,
    /// The server could not be told; only the local session was ended.
    LocalOnly { reason: String },
    /// There was no access token to revoke.
    AlreadySignedOut,
}

/// Owns the token pair and mediates every request to the protected API.
pub struct SessionClient {
    tokens: TokenStore,
    transport: Arc<dyn HttpTransport>,
    /// Serializes refreshes; see [`SessionClient::refresh_after`].
    refresh_lock: Mutex<()>,
}

impl SessionClient {
    /// Create a session client over an explicit token store and transport.
    pub fn new(tokens: TokenStore, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            tokens,
            transport,
            refresh_lock: Mutex::new(()),
        }
    }

    /// Create a session client that talks to `base_url` over reqwest.
    pub fn connect(
        tokens: TokenStore,
        base_url: Url,
        timeout: Option<Duration>,
    ) -> SessionResult<Self> {
        let transport = ReqwestTransport::new(base_url, timeout)?;
        Ok(Self::new(tokens, Arc::new(transport)))
    }

    pub(crate) fn transport(&self) -> &dyn HttpTransport {
        self.transport.as_ref()
    }

    // ========================================================================
    // Token store
    // ========================================================================

    /// Store both tokens, overwriting any previous pair.
    pub fn set_tokens(&self, access_token: &str, refresh_token: &str) -> SessionResult<()> {
        Ok(self.tokens.set_tokens(access_token, refresh_token)?)
    }

    pub fn access_token(&self) -> SessionResult<Option<String>> {
        Ok(self.tokens.get_access_token()?)
    }

    pub fn refresh_token(&self) -> SessionResult<Option<String>> {
        Ok(self.tokens.get_refresh_token()?)
    }

    /// Remove both tokens. Idempotent.
    pub fn clear_tokens(&self) -> SessionResult<()> {
        Ok(self.tokens.clear_tokens()?)
    }

    /// True iff an access token is stored. Expiry is not checked locally;
    /// a stale token counts until the server rejects it and refresh fails.
    pub fn is_authenticated(&self) -> SessionResult<bool> {
        Ok(self.tokens.is_authenticated()?)
    }

    // ========================================================================
    // Refresh
    // ========================================================================

    /// Exchange the refresh token for a new access token.
    ///
    /// Returns `None` without any request when no refresh token is stored.
    /// On any failure both tokens are cleared and `None` is returned. A
    /// refresh already in flight is joined rather than repeated.
    pub async fn refresh_access_token(&self) -> Option<String> {
        let observed = match self.tokens.get_access_token() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Could not read access token before refresh");
                return None;
            }
        };
        self.refresh_after(observed.as_deref()).await
    }

    /// Refresh unless someone else already replaced `stale` while we waited.
    ///
    /// The lock is held across the network round-trip. Once acquired, the
    /// stored access token is compared with the one the caller saw rejected:
    /// if it changed, another caller's refresh (or clear) has settled and its
    /// result is shared. A failed refresh leaves no token, so waiters see
    /// `None` as well.
    ///
    /// The result is only written back while the refresh token it was spent
    /// on is still stored. After a logout or a new sign-in mid-flight the
    /// refreshed token is dropped and `None` is returned, so the request that
    /// triggered it is not re-sent.
    async fn refresh_after(&self, stale: Option<&str>) -> Option<String> {
        let _guard = self.refresh_lock.lock().await;

        let current = match self.tokens.get_access_token() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Could not read access token for refresh");
                return None;
            }
        };
        if current.as_deref() != stale {
            debug!(
                refreshed = current.is_some(),
                "Access token changed while waiting, reusing result"
            );
            return current;
        }

        let refresh_token = match self.tokens.get_refresh_token() {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("No refresh token stored, skipping refresh");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Could not read refresh token");
                return None;
            }
        };

        match self.request_new_access_token(&refresh_token).await {
            Ok(access_token) => {
                match self.tokens.replace_access_token(&refresh_token, &access_token) {
                    Ok(true) => {
                        info!("Access token refreshed");
                        Some(access_token)
                    }
                    Ok(false) => {
                        debug!("Session changed during refresh, discarding refreshed token");
                        None
                    }
                    Err(e) => {
                        warn!(error = %e, "Could not store refreshed access token, clearing session");
                        self.clear_after_failure(&refresh_token);
                        None
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed, clearing session");
                self.clear_after_failure(&refresh_token);
                None
            }
        }
    }

    async fn request_new_access_token(&self, refresh_token: &str) -> SessionResult<String> {
        let request = ApiRequest::get(REFRESH_PATH).bearer(refresh_token)?;
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            let status = response.status;
            warn!(status = %status, "Refresh endpoint rejected the request");
            return Err(response.into_api_error("Token refresh failed"));
        }

        let data: RefreshResponse = response.json()?;
        Ok(data.access_token)
    }

    /// Clear the pair the failed refresh was spent on. A pair stored since
    /// then (a new sign-in) is left alone.
    fn clear_after_failure(&self, refresh_token: &str) {
        match self.tokens.clear_tokens_if_refresh(refresh_token) {
            Ok(true) => {}
            Ok(false) => debug!("Session changed during refresh, keeping it"),
            Err(e) => warn!(error = %e, "Failed to clear tokens"),
        }
    }

    // ========================================================================
    // Requests
    // ========================================================================

    /// Send `request` with the stored access token attached.
    ///
    /// Defaults `Content-Type: application/json` and the bearer header;
    /// caller headers win for the same name. A 401 triggers exactly one
    /// refresh and one re-send with the new token. Every other status is
    /// returned untouched for the caller to interpret.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NoSession`] when no access token is stored (nothing is sent)
    /// - [`SessionError::SessionExpired`] when the 401-driven refresh fails
    /// - transport errors from either send, unchanged
    pub async fn authenticated_fetch(&self, request: ApiRequest) -> SessionResult<ApiResponse> {
        let access_token = self.tokens.get_access_token()?.ok_or(SessionError::NoSession)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, bearer_value(&access_token)?);
        headers.extend(request.headers);

        let prepared = ApiRequest { headers, ..request };
        let response = self.transport.send(prepared.clone()).await?;
        if response.status != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        debug!(
            method = %prepared.method,
            path = %prepared.route(),
            "Request unauthorized, refreshing access token"
        );

        let Some(new_access_token) = self.refresh_after(Some(&access_token)).await else {
            return Err(SessionError::SessionExpired);
        };

        let mut retry = prepared;
        retry
            .headers
            .insert(AUTHORIZATION, bearer_value(&new_access_token)?);
        self.transport.send(retry).await
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// End the session.
    ///
    /// When an access token is stored the server is asked to revoke it; that
    /// request can fail without affecting the result. Both tokens are cleared
    /// afterwards in every case. Only a local storage failure is an error.
    pub async fn logout(&self) -> SessionResult<LogoutOutcome> {
        let access_token = match self.tokens.get_access_token() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Could not read access token, clearing session anyway");
                None
            }
        };

        let outcome = match access_token {
            None => LogoutOutcome::AlreadySignedOut,
            Some(token) => match self.revoke(&token).await {
                Ok(()) => LogoutOutcome::Revoked,
                Err(e) => {
                    warn!(error = %e, "Logout request failed");
                    LogoutOutcome::LocalOnly {
                        reason: e.to_string(),
                    }
                }
            },
        };

        self.tokens.clear_tokens()?;
        info!(outcome = ?outcome, "Logged out");
        Ok(outcome)
    }

    async fn revoke(&self, access_token: &str) -> SessionResult<()> {
        let request = ApiRequest::get(LOGOUT_PATH).bearer(access_token)?;
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(response.into_api_error("Logout request was rejected"));
        }
        Ok(())
    }

    /// Fetch the signed-in user.
    ///
    /// Never fails: a missing or expired session is `SignedOut`, anything
    /// else that prevents reading the user is `Unavailable`.
    pub async fn current_user(&self) -> CurrentUser {
        let response = match self
            .authenticated_fetch(ApiRequest::get(CURRENT_USER_PATH))
            .await
        {
            Ok(response) => response,
            Err(e) if e.requires_login() => {
                debug!(error = %e, "No usable session for current user");
                return CurrentUser::SignedOut;
            }
            Err(e) => {
                warn!(error = %e, "Failed to get current user");
                return CurrentUser::Unavailable {
                    reason: e.to_string(),
                };
            }
        };

        if !response.is_success() {
            let status = response.status;
            warn!(status = %status, "Current user request was not successful");
            return CurrentUser::Unavailable {
                reason: response
                    .error_message()
                    .unwrap_or_else(|| format!("HTTP {}", status)),
            };
        }

        match response.json::<Value>() {
            Ok(value) => CurrentUser::Authenticated(UserRecord::new(value)),
            Err(e) => {
                warn!(error = %e, "Current user response was not JSON");
                CurrentUser::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }
}
