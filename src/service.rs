//! Auth service: remote auth calls plus local session handling.
//!
//! DESIGN
//! ======
//! Each remote operation is one API call. Calls that return a token
//! (`login`, `signup`, `update_token`) persist it before returning, so the
//! caller sees an updated session as soon as the future resolves. Session
//! checks are local and never touch the network.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::api::ApiClient;
use crate::claims::TokenClaims;
use crate::config::ClientConfig;
use crate::error::AuthError;
use crate::router::{Navigator, Role, Route};
use crate::session::{SessionState, UserContext, check_session};
use crate::store::TokenStore;

#[cfg(test)]
#[path = "service_test.rs"]
mod tests;

const LOGIN_PATH: &str = "/auth/authorise";
const SIGNUP_PATH: &str = "/auth/signup";
const ME_PATH: &str = "/auth/me";
const REFRESH_PATH: &str = "/auth/me/refresh";
const FORGOT_PASSWORD_PATH: &str = "/auth/forgot/password";

/// Body of a token-issuing response. Fields besides `token` are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

pub struct AuthService<S, N> {
    api: ApiClient,
    store: S,
    navigator: N,
    providers: Vec<String>,
}

impl<S: TokenStore, N: Navigator> AuthService<S, N> {
    #[must_use]
    pub fn new(api: ApiClient, store: S, navigator: N, providers: Vec<String>) -> Self {
        Self { api, store, navigator, providers }
    }

    /// Build the HTTP client from `config` and wire it to `store` and `navigator`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn from_config(config: &ClientConfig, store: S, navigator: N) -> Result<Self, AuthError> {
        let api = ApiClient::new(config.api_url.clone(), config.timeouts)?;
        Ok(Self::new(api, store, navigator, config.providers.clone()))
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    // =========================================================================
    // REMOTE
    // =========================================================================

    /// Exchange credentials for a token and store it.
    ///
    /// # Errors
    ///
    /// Fails on transport or API errors, a response without `token`, or a
    /// store write failure.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let body = json!({ "email": email, "password": password });
        let response = self.api.post_json(LOGIN_PATH, &body, None).await?;
        let auth = self.accept_token(response)?;
        tracing::info!("logged in");
        Ok(auth)
    }

    /// Create an account and store the issued token.
    ///
    /// # Errors
    ///
    /// Same as [`AuthService::login`].
    pub async fn signup(&self, email: &str, password: &str, name: &str) -> Result<AuthResponse, AuthError> {
        let body = json!({ "email": email, "password": password, "name": name });
        let response = self.api.post_json(SIGNUP_PATH, &body, None).await?;
        let auth = self.accept_token(response)?;
        tracing::info!("signed up");
        Ok(auth)
    }

    /// Fetch the current user's profile from the API.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingToken`] when no token is stored, or any
    /// transport or API error.
    pub async fn fetch_user(&self) -> Result<Value, AuthError> {
        let token = self.require_token()?;
        self.api.get_json(ME_PATH, Some(&token)).await
    }

    /// Trade the stored token for a fresh one.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingToken`] when no token is stored, otherwise
    /// the same failures as [`AuthService::login`].
    pub async fn update_token(&self) -> Result<AuthResponse, AuthError> {
        let token = self.require_token()?;
        let response = self.api.get_json(REFRESH_PATH, Some(&token)).await?;
        let auth = self.accept_token(response)?;
        tracing::info!("token refreshed");
        Ok(auth)
    }

    /// Ask the API to send a password reset email.
    ///
    /// # Errors
    ///
    /// Any transport or API error.
    pub async fn reset_password(&self, email: &str) -> Result<Value, AuthError> {
        let body = json!({ "email": email });
        let response = self.api.post_json(FORGOT_PASSWORD_PATH, &body, None).await?;
        tracing::info!("password reset requested");
        Ok(response)
    }

    // =========================================================================
    // LOCAL
    // =========================================================================

    /// Configured login providers.
    #[must_use]
    pub fn auth_providers(&self) -> &[String] {
        &self.providers
    }

    /// Full session classification at the current time.
    ///
    /// # Errors
    ///
    /// Only store failures.
    pub fn session(&self, ctx: Option<&mut UserContext>) -> Result<SessionState, AuthError> {
        check_session(&self.store, now_secs(), ctx)
    }

    /// Claims of the stored token when it decodes and has not expired.
    ///
    /// # Errors
    ///
    /// Only store failures.
    pub fn logged_in(&self, ctx: Option<&mut UserContext>) -> Result<Option<TokenClaims>, AuthError> {
        self.logged_in_at(now_secs(), ctx)
    }

    /// [`AuthService::logged_in`] against an explicit clock.
    ///
    /// # Errors
    ///
    /// Only store failures.
    pub fn logged_in_at(&self, now_secs: i64, ctx: Option<&mut UserContext>) -> Result<Option<TokenClaims>, AuthError> {
        Ok(check_session(&self.store, now_secs, ctx)?.into_active())
    }

    /// Send the user to their role's area, or log out and go to login.
    ///
    /// # Errors
    ///
    /// Only store failures.
    pub fn redirect_user(&self, ctx: Option<&mut UserContext>) -> Result<Route, AuthError> {
        self.redirect_user_at(now_secs(), ctx)
    }

    /// [`AuthService::redirect_user`] against an explicit clock.
    ///
    /// # Errors
    ///
    /// Only store failures.
    pub fn redirect_user_at(&self, now_secs: i64, ctx: Option<&mut UserContext>) -> Result<Route, AuthError> {
        let home = self
            .logged_in_at(now_secs, ctx)?
            .and_then(|claims| Role::parse(claims.user().role.as_deref()).home());

        match home {
            Some(route) => {
                tracing::info!(%route, "redirecting to role home");
                self.navigator.push(route);
                Ok(route)
            }
            None => self.logout(),
        }
    }

    /// Replace the stored token.
    ///
    /// # Errors
    ///
    /// Store write failures.
    pub fn set_token(&self, token: &str) -> Result<(), AuthError> {
        self.store.set(token)
    }

    /// The stored token, if any.
    ///
    /// # Errors
    ///
    /// Store read failures.
    pub fn get_token(&self) -> Result<Option<String>, AuthError> {
        self.store.get()
    }

    /// Forget the token and send the user to the login page.
    ///
    /// # Errors
    ///
    /// Store failures; navigation does not happen if the token cannot be removed.
    pub fn logout(&self) -> Result<Route, AuthError> {
        self.store.remove()?;
        tracing::info!("logged out");
        self.navigator.push(Route::Login);
        Ok(Route::Login)
    }

    fn require_token(&self) -> Result<String, AuthError> {
        self.store.get()?.ok_or(AuthError::MissingToken)
    }

    fn accept_token(&self, response: Value) -> Result<AuthResponse, AuthError> {
        let auth = parse_auth_response(response)?;
        self.store.set(&auth.token)?;
        Ok(auth)
    }
}

fn parse_auth_response(response: Value) -> Result<AuthResponse, AuthError> {
    let auth: AuthResponse =
        serde_json::from_value(response).map_err(|e| AuthError::ApiParse(format!("auth response: {e}")))?;
    if auth.token.trim().is_empty() {
        return Err(AuthError::ApiParse("auth response: empty token".into()));
    }
    Ok(auth)
}

fn now_secs() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}
