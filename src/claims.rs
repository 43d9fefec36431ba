//! Bearer token payload decoding.
//!
//! The client never holds the signing key, so the signature is not checked
//! here. Claims are read only to drive local session state and routing; the
//! server re-validates the token on every authenticated request.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::AuthError;

#[cfg(test)]
#[path = "claims_test.rs"]
mod tests;

/// Decoded token payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiry as seconds since the Unix epoch.
    /// Fractional values are truncated to whole seconds.
    #[serde(default, deserialize_with = "numeric_date")]
    pub exp: Option<i64>,
    #[serde(default, deserialize_with = "numeric_date")]
    pub iat: Option<i64>,
    pub data: TokenData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenData {
    pub user: TokenUser,
}

/// User fields embedded in the token. Unknown fields are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUser {
    /// Number or string, whichever the API issues.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenClaims {
    /// A token without `exp` never expires.
    #[must_use]
    pub fn is_expired_at(&self, now_secs: i64) -> bool {
        self.exp.is_some_and(|exp| exp <= now_secs)
    }

    #[must_use]
    pub fn user(&self) -> &TokenUser {
        &self.data.user
    }
}

/// Decode a token payload without verifying its signature.
///
/// Only the payload segment is read. The header is not parsed, so any
/// signing algorithm is accepted.
///
/// # Errors
///
/// Returns [`AuthError::TokenDecode`] if the token has no payload segment,
/// the payload is not base64url JSON, or it lacks `data.user`.
pub fn decode_claims(token: &str) -> Result<TokenClaims, AuthError> {
    let mut segments = token.trim().split('.');
    let payload = match (segments.next(), segments.next()) {
        (Some(header), Some(payload)) if !header.is_empty() && !payload.is_empty() => payload,
        _ => return Err(AuthError::TokenDecode("expected header.payload[.signature]".into())),
    };
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| AuthError::TokenDecode(format!("payload is not base64url: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| AuthError::TokenDecode(format!("payload: {e}")))
}

fn numeric_date<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Number>::deserialize(deserializer)?;
    Ok(raw.and_then(|n| n.as_i64().or_else(|| n.as_f64().map(truncate_secs))))
}

#[allow(clippy::cast_possible_truncation)]
fn truncate_secs(secs: f64) -> i64 {
    secs.trunc() as i64
}
