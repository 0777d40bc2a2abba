//! Sign-in and registration.
//!
//! These are the only calls that reach the API without a bearer token.

use crate::{ApiRequest, SessionClient, SessionError, SessionResult};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

const LOGIN_EMAIL_PATH: &str = "/api/auth/login-email";
const LOGIN_USERNAME_PATH: &str = "/api/auth/login-username";
const REGISTER_PATH: &str = "/api/auth/register";

#[derive(Debug, Deserialize)]
struct LoginResponse {
    tokens: LoginTokens,
}

#[derive(Debug, Deserialize)]
struct LoginTokens {
    access: String,
    refresh: String,
}

/// New account details. Registration does not sign the user in.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SessionClient {
    /// Sign in with email and password, storing the returned token pair.
    pub async fn login_with_email(&self, email: &str, password: &str) -> SessionResult<()> {
        self.login(
            LOGIN_EMAIL_PATH,
            json!({ "email": email, "password": password }),
        )
        .await
    }

    /// Sign in with username and password, storing the returned token pair.
    pub async fn login_with_username(&self, username: &str, password: &str) -> SessionResult<()> {
        self.login(
            LOGIN_USERNAME_PATH,
            json!({ "username": username, "password": password }),
        )
        .await
    }

    async fn login(&self, path: &str, credentials: serde_json::Value) -> SessionResult<()> {
        let request = ApiRequest::post(path).json(&credentials)?;
        let response = self.transport().send(request).await?;

        if response.status == StatusCode::UNAUTHORIZED {
            warn!(status = %response.status, "Login rejected");
            return Err(SessionError::InvalidCredentials(
                response
                    .error_message()
                    .unwrap_or_else(|| "Invalid credentials".to_string()),
            ));
        }
        if !response.is_success() {
            warn!(status = %response.status, "Login failed");
            return Err(response.into_api_error("Login failed"));
        }

        let data: LoginResponse = response.json()?;
        self.set_tokens(&data.tokens.access, &data.tokens.refresh)?;

        info!("Logged in");
        Ok(())
    }

    /// Create an account.
    pub async fn register(&self, registration: &Registration) -> SessionResult<()> {
        let request = ApiRequest::post(REGISTER_PATH).json(registration)?;
        let response = self.transport().send(request).await?;

        if !response.is_success() {
            warn!(status = %response.status, "Registration failed");
            return Err(response.into_api_error("Registration failed"));
        }

        info!(username = %registration.username, "Account registered");
        Ok(())
    }
}
