//! authgate — client-side session helper for a token-issuing auth API.
//!
//! SYSTEM CONTEXT
//! ==============
//! The API issues a signed bearer token on login, signup, and refresh. This
//! crate stores that token, reads its claims locally to decide whether the
//! user is still logged in, and routes the user by the role claim.

pub mod api;
pub mod claims;
pub mod config;
pub mod error;
pub mod router;
pub mod service;
pub mod session;
pub mod store;

#[cfg(test)]
mod test_support;

pub use api::ApiClient;
pub use claims::{TokenClaims, TokenUser, decode_claims};
pub use config::ClientConfig;
pub use error::{AuthError, ErrorCode};
pub use router::{Navigator, RecordingNavigator, Role, Route};
pub use service::{AuthResponse, AuthService};
pub use session::{SessionState, UserContext};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
