//! Request and response values passed through an [`HttpTransport`](crate::HttpTransport).

use crate::{SessionError, SessionResult};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// An API request relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path (with optional query string), or an absolute URL.
    pub path: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append query parameters, percent-encoded.
    pub fn query<K, V>(mut self, pairs: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        if pairs.is_empty() {
            return self;
        }
        let mut encoded = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in pairs {
            encoded.append_pair(key.as_ref(), value.as_ref());
        }
        let separator = if self.path.contains('?') { '&' } else { '?' };
        self.path = format!("{}{}{}", self.path, separator, encoded.finish());
        self
    }

    /// Set a header, replacing any previous value.
    pub fn header(mut self, name: HeaderName, value: &str) -> SessionResult<Self> {
        let value = HeaderValue::from_str(value)
            .map_err(|e| SessionError::InvalidHeader(format!("{}: {}", name, e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Attach `Authorization: Bearer <token>`.
    pub fn bearer(mut self, token: &str) -> SessionResult<Self> {
        self.headers.insert(AUTHORIZATION, bearer_value(token)?);
        Ok(self)
    }

    /// Serialize `body` as the JSON payload and mark the content type.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> SessionResult<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        self.headers
            .entry(CONTENT_TYPE)
            .or_insert(HeaderValue::from_static("application/json"));
        Ok(self)
    }

    /// Path without the query string.
    pub fn route(&self) -> &str {
        self.path.split('?').next().unwrap_or(&self.path)
    }

    /// The bearer token carried by this request, if any.
    pub fn bearer_token(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
    }

    /// The body decoded as JSON, if present and valid.
    pub fn json_body(&self) -> Option<Value> {
        self.body
            .as_deref()
            .and_then(|bytes| serde_json::from_slice(bytes).ok())
    }
}

pub(crate) fn bearer_value(token: &str) -> SessionResult<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| SessionError::InvalidHeader("token is not a valid header value".to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}

/// A fully-read response. The status is not interpreted here.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Build a JSON response (used by custom transports and tests).
    pub fn from_json(status: StatusCode, body: &Value) -> Self {
        let mut response = Self::new(status, body.to_string());
        response.headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        response
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> SessionResult<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Human-readable error carried by the body.
    ///
    /// Reads `error`, then `errors`, then `message`. Field-keyed validation
    /// maps (`{"field": ["msg"]}`) are flattened to `field: msg` pairs.
    pub fn error_message(&self) -> Option<String> {
        let body: Value = serde_json::from_slice(&self.body).ok()?;
        ["error", "errors", "message"]
            .iter()
            .filter_map(|key| body.get(*key))
            .find_map(describe)
    }

    /// Convert a non-success response into [`SessionError::Api`].
    pub fn into_api_error(self, fallback: &str) -> SessionError {
        SessionError::Api {
            status: self.status.as_u16(),
            message: self.error_message().unwrap_or_else(|| fallback.to_string()),
        }
    }
}

fn describe(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(describe).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::Object(fields) => {
            let parts: Vec<String> = fields
                .iter()
                .filter_map(|(field, detail)| describe(detail).map(|d| format!("{}: {}", field, d)))
                .collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
}
