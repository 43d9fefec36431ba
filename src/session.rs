//! Session state inferred from the stored token.

use crate::claims::{TokenClaims, TokenUser, decode_claims};
use crate::error::AuthError;
use crate::store::TokenStore;

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

/// User context handed to UI code. `populated` means the user fields came
/// from a decoded token.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserContext {
    pub logged_in: bool,
    pub populated: bool,
    pub user: Option<TokenUser>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    LoggedOut,
    Active(TokenClaims),
    Expired(TokenClaims),
}

impl SessionState {
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    /// Claims for an active session only.
    #[must_use]
    pub fn into_active(self) -> Option<TokenClaims> {
        match self {
            Self::Active(claims) => Some(claims),
            Self::LoggedOut | Self::Expired(_) => None,
        }
    }
}

/// Classify the stored token at `now_secs`, filling `ctx` when given.
///
/// An undecodable token is removed from the store and reported as logged
/// out. The context is marked logged in as soon as the token decodes, even
/// when it has expired.
///
/// # Errors
///
/// Returns [`AuthError::Storage`] only when the store itself fails.
pub fn check_session(
    store: &impl TokenStore,
    now_secs: i64,
    ctx: Option<&mut UserContext>,
) -> Result<SessionState, AuthError> {
    let Some(token) = store.get()? else {
        if let Some(ctx) = ctx {
            *ctx = UserContext { logged_in: false, populated: false, user: None };
        }
        return Ok(SessionState::LoggedOut);
    };

    let claims = match decode_claims(&token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!(error = %e, "discarding undecodable token");
            store.remove()?;
            return Ok(SessionState::LoggedOut);
        }
    };

    if let Some(ctx) = ctx {
        *ctx = UserContext { logged_in: true, populated: true, user: Some(claims.user().clone()) };
    }

    if claims.is_expired_at(now_secs) {
        tracing::debug!(exp = ?claims.exp, now = now_secs, "stored token expired");
        return Ok(SessionState::Expired(claims));
    }
    Ok(SessionState::Active(claims))
}
