//! Token builders shared by unit tests.

use jsonwebtoken::{EncodingKey, Header};
use serde_json::{Value, json};

pub const NOW: i64 = 1_700_000_000;

/// Sign `payload` with a throwaway key. The client never checks it.
pub fn sign(payload: &Value) -> String {
    jsonwebtoken::encode(&Header::default(), payload, &EncodingKey::from_secret(b"server-only-secret")).unwrap()
}

/// Token for a user with `role`, expiring `ttl` seconds after [`NOW`].
pub fn token_for(role: &str, ttl: i64) -> String {
    sign(&json!({
        "exp": NOW + ttl,
        "iat": NOW - 60,
        "data": { "user": { "id": 7, "email": "ada@example.test", "name": "Ada", "role": role } }
    }))
}
