//! Agent login and session state

use std::sync::Arc;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Duration;
use chrono::Utc;
use tokio::sync::watch;

use super::AccessToken;
use super::Session;
use super::SessionStore;
use super::TokenProvider;
use crate::AlfaClient;
use crate::error::AuthError;
use crate::error::Error;
use crate::model::Agent;
use crate::model::ApiEnvelope;
use crate::model::Credentials;
use crate::model::LoginData;

const LOGIN_PATH: &str = "auth/agente/login";

/// Logs agents in and out and tracks the current session.
///
/// A session found in the store at construction is restored without asking
/// the server. Session changes are broadcast through [`AuthService::subscribe`].
pub struct AuthService {
    client: AlfaClient,
    store: Arc<dyn SessionStore>,
    session: RwLock<Option<Session>>,
    agent_tx: watch::Sender<Option<Agent>>,
}

impl AuthService {
    pub fn new(client: AlfaClient, store: Arc<dyn SessionStore>) -> Self {
        let session = match store.load() {
            Ok(Some(session)) if !session.token.is_empty() => {
                log::info!("Restored session for {}", session.agent.username);
                Some(session)
            }
            Ok(_) => None,
            Err(e) => {
                log::warn!("Failed to restore session: {}", e);
                None
            }
        };

        let (agent_tx, _) = watch::channel(session.as_ref().map(|s| s.agent.clone()));
        Self {
            client,
            store,
            session: RwLock::new(session),
            agent_tx,
        }
    }

    /// Log in. Failures are logged and reported as `false`.
    pub async fn login(&self, credentials: &Credentials) -> bool {
        match self.try_login(credentials).await {
            Ok(agent) => {
                log::info!("Agent {} logged in", agent.username);
                true
            }
            Err(e) => {
                log::error!("Login failed for {}: {}", credentials.username, e);
                false
            }
        }
    }

    /// Log in, keeping the failure.
    pub async fn try_login(&self, credentials: &Credentials) -> Result<Agent, Error> {
        let envelope: ApiEnvelope<LoginData> = self.client.post(LOGIN_PATH, credentials).await?;
        if !envelope.success {
            return Err(AuthError::Rejected {
                message: envelope.failure_message(),
            }
            .into());
        }
        let data = envelope
            .data
            .ok_or_else(|| AuthError::Parse("login response without data".to_string()))?;

        let expires_in = i64::try_from(data.expires_in).unwrap_or(i64::MAX);
        let session = Session {
            token: data.token,
            agent: data.agent,
            expires_at: Duration::try_seconds(expires_in).and_then(|d| Utc::now().checked_add_signed(d)),
        };
        if let Err(e) = self.store.save(&session) {
            log::warn!("Failed to persist session: {}", e);
        }

        let agent = session.agent.clone();
        self.set_session(Some(session))?;
        Ok(agent)
    }

    /// Drop the session everywhere and notify subscribers.
    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            log::warn!("Failed to clear stored session: {}", e);
        }
        if let Err(e) = self.set_session(None) {
            log::error!("Failed to clear session: {}", e);
        }
        log::info!("Agent logged out");
    }

    pub fn current_token(&self) -> Option<String> {
        self.read_session().map(|s| s.token)
    }

    pub fn current_agent(&self) -> Option<Agent> {
        self.read_session().map(|s| s.agent)
    }

    pub fn is_authenticated(&self) -> bool {
        self.read_session().is_some()
    }

    /// Stream of the current agent; `None` while logged out.
    pub fn subscribe(&self) -> watch::Receiver<Option<Agent>> {
        self.agent_tx.subscribe()
    }

    fn read_session(&self) -> Option<Session> {
        self.session.read().ok().and_then(|s| s.clone())
    }

    fn set_session(&self, session: Option<Session>) -> Result<(), AuthError> {
        let agent = session.as_ref().map(|s| s.agent.clone());
        *self
            .session
            .write()
            .map_err(|_| AuthError::Storage("session lock poisoned".to_string()))? = session;
        self.agent_tx.send_replace(agent);
        Ok(())
    }
}

#[async_trait]
impl TokenProvider for AuthService {
    async fn get_token(&self) -> Result<AccessToken, AuthError> {
        let session = self.read_session().ok_or(AuthError::NotAuthenticated)?;
        let mut token = AccessToken::new(session.token);
        if let Some(expires_at) = session.expires_at {
            token = token.expiring_at(expires_at);
        }
        if token.is_expired() {
            return Err(AuthError::SessionExpired);
        }
        Ok(token)
    }
}
