//! Authentication error types

/// Errors that can occur during authentication and session handling.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The server answered the login with `success: false`.
    #[error("Login rejected: {message}")]
    Rejected { message: String },

    /// No agent is logged in.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The session token is past its expiry.
    #[error("Session expired")]
    SessionExpired,

    /// Failed to read or write the persisted session.
    #[error("Session storage error: {0}")]
    Storage(String),

    /// Failed to parse authentication response.
    #[error("Auth response parse error: {0}")]
    Parse(String),
}
