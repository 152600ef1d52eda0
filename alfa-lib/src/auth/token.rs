//! Bearer tokens and where the client gets them

use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::error::AuthError;

/// The JWT sent as `Authorization: Bearer ...`.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// A token with no known expiry.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expires_at: None,
        }
    }

    pub fn expiring_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Tokens without an expiry never expire.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"***")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Supplies the token for each authenticated request.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn get_token(&self) -> Result<AccessToken, AuthError>;
}

#[async_trait]
impl<T: TokenProvider + ?Sized> TokenProvider for Arc<T> {
    async fn get_token(&self) -> Result<AccessToken, AuthError> {
        T::get_token(self).await
    }
}

/// Hands out one fixed token. For scripts and tests that already hold a JWT.
///
/// ```
/// use alfa_lib::auth::StaticTokenProvider;
///
/// let provider = StaticTokenProvider::new("eyJhbGciOi...");
/// ```
#[derive(Debug, Clone)]
pub struct StaticTokenProvider(AccessToken);

impl StaticTokenProvider {
    pub fn new(value: impl Into<String>) -> Self {
        Self(AccessToken::new(value))
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token(&self) -> Result<AccessToken, AuthError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        assert!(!AccessToken::new("t").is_expired_at(now));

        let token = AccessToken::new("t").expiring_at(now + Duration::hours(1));
        assert!(!token.is_expired_at(now));
        assert!(token.is_expired_at(now + Duration::hours(1)));
    }

    #[test]
    fn test_debug_hides_value() {
        let debug = format!("{:?}", AccessToken::new("secret-jwt"));
        assert!(!debug.contains("secret-jwt"));
    }

    #[tokio::test]
    async fn test_static_provider_through_arc() {
        let provider: Arc<dyn TokenProvider> = Arc::new(StaticTokenProvider::new("abc"));
        let token = provider.get_token().await.unwrap();
        assert_eq!(token.value(), "abc");
    }
}
