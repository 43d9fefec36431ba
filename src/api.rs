//! Thin JSON-over-HTTP wrapper for the auth API.
//!
//! DESIGN
//! ======
//! Every auth call is a single request with an optional JSON body and an
//! optional bearer token. Status and body handling live in pure helpers
//! (`endpoint`, `error_message`, `parse_body`) so they can be unit tested
//! without a server.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, StatusCode};
use serde_json::Value;

use crate::config::Timeouts;
use crate::error::AuthError;

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for `base_url` with request and connect timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::HttpClientBuild`] if reqwest cannot build its client.
    pub fn new(base_url: impl Into<String>, timeouts: Timeouts) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| AuthError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.into() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}{path}`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get_json(&self, path: &str, bearer: Option<&str>) -> Result<Value, AuthError> {
        self.request(Method::GET, path, None, bearer).await
    }

    /// `POST {base}{path}` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post_json(&self, path: &str, body: &Value, bearer: Option<&str>) -> Result<Value, AuthError> {
        self.request(Method::POST, path, Some(body), bearer).await
    }

    /// Send one request and decode the JSON response.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Request`] when the request cannot be sent or read.
    /// - [`AuthError::ApiResponse`] for any non-2xx status.
    /// - [`AuthError::ApiParse`] when a 2xx body is not JSON.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        bearer: Option<&str>,
    ) -> Result<Value, AuthError> {
        let url = endpoint(&self.base_url, path);
        tracing::debug!(%method, %url, authenticated = bearer.is_some(), "auth api request");

        let mut request = self.http.request(method.clone(), &url);
        if let Some(token) = bearer {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(json) = body {
            request = request.json(json);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        if !status.is_success() {
            let message = error_message(status, &text);
            tracing::warn!(%method, %url, status = status.as_u16(), %message, "auth api error");
            return Err(AuthError::ApiResponse { status: status.as_u16(), message });
        }

        parse_body(&text)
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn endpoint(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Best human-readable message for a failed response.
///
/// Prefers a JSON `message` or `error` string, then the raw body, then the
/// status reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(message) = map.get(key).and_then(Value::as_str) {
                return message.to_owned();
            }
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_owned();
    }
    status.canonical_reason().unwrap_or("request failed").to_owned()
}

/// Empty success bodies decode as `null`.
fn parse_body(body: &str) -> Result<Value, AuthError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| AuthError::ApiParse(e.to_string()))
}
