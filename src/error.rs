//! Error types shared by every auth operation.
//!
//! ERROR HANDLING
//! ==============
//! Every failure maps to a stable `E_*` code so the CLI and embedders can
//! branch on the kind of failure without matching on display strings.

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

/// Stable machine-readable code plus retry hint for an error.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// Errors produced by config loading, API calls, and token handling.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A configuration value is missing or malformed.
    #[error("config error: {0}")]
    Config(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The HTTP request could not be sent or the body could not be read.
    #[error("API request failed: {0}")]
    Request(String),

    /// The API answered with a non-success status.
    #[error("API returned {status}: {message}")]
    ApiResponse { status: u16, message: String },

    /// The API answered successfully but the body was not what we expected.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The local token store could not be read or written.
    #[error("token storage failed: {0}")]
    Storage(String),

    /// The stored token could not be decoded.
    #[error("token decode failed: {0}")]
    TokenDecode(String),

    /// An operation needed a token but none is stored.
    #[error("no token stored; log in first")]
    MissingToken,
}

impl ErrorCode for AuthError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "E_CONFIG",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Request(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::Storage(_) => "E_STORAGE",
            Self::TokenDecode(_) => "E_TOKEN_DECODE",
            Self::MissingToken => "E_MISSING_TOKEN",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

impl From<std::io::Error> for AuthError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
