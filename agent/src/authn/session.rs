//! Session state and fetch epochs
//!
//! The session is the opaque "is the user authenticated" signal. Each
//! transition into or out of the authenticated state bumps the epoch; a poll
//! captures the epoch before its network call and its response is discarded
//! if the epoch moved in the meantime.

use std::sync::RwLock;

use async_trait::async_trait;
use secrecy::SecretString;
use tracing::{info, warn};

use crate::authn::session_token::SessionToken;
use crate::errors::AgentError;

/// Authentication signal observed by the pollers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthState {
    pub authenticated: bool,
    pub loading: bool,
}

/// Captured at the start of a poll
#[derive(Debug, Clone)]
pub struct PollTicket {
    pub epoch: u64,
    pub token: SecretString,
}

/// Validates a token against the backend before the session is trusted
#[async_trait]
pub trait SessionValidator: Send + Sync {
    async fn validate(&self, token: &SecretString) -> Result<(), AgentError>;
}

#[derive(Default)]
struct SessionInner {
    token: Option<SessionToken>,
    auth: AuthState,
    epoch: u64,
    login_seq: u64,
}

impl SessionInner {
    fn set_authenticated(&mut self, authenticated: bool) {
        if self.auth.authenticated != authenticated {
            self.epoch += 1;
        }
        self.auth.authenticated = authenticated;
    }
}

/// Current session
#[derive(Default)]
pub struct Session {
    inner: RwLock<SessionInner>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AuthState {
        self.read(|inner| inner.auth)
    }

    pub fn epoch(&self) -> u64 {
        self.read(|inner| inner.epoch)
    }

    /// Token expiry, if the session holds a JWT
    pub fn expires_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.read(|inner| inner.token.as_ref().and_then(SessionToken::expires_at))
    }

    /// Log in with `token`, validating it first. The session reports loading
    /// while validation is in flight.
    pub async fn login<V>(&self, token: SessionToken, validator: &V) -> Result<(), AgentError>
    where
        V: SessionValidator + ?Sized,
    {
        if token.is_expired() {
            return Err(AgentError::AuthError("Token has expired".to_string()));
        }

        let secret = token.secret().clone();
        let seq = self.write(|inner| {
            inner.login_seq += 1;
            inner.token = Some(token);
            inner.auth.loading = true;
            inner.set_authenticated(false);
            inner.login_seq
        });

        let result = validator.validate(&secret).await;

        self.write(|inner| {
            if inner.login_seq != seq {
                // superseded by a later login or a logout
                return Err(AgentError::AuthError("Login superseded".to_string()));
            }
            inner.auth.loading = false;
            match result {
                Ok(()) => {
                    inner.set_authenticated(true);
                    info!("Session authenticated (epoch {})", inner.epoch);
                    Ok(())
                }
                Err(e) => {
                    inner.token = None;
                    warn!("Session validation failed: {}", e);
                    Err(e)
                }
            }
        })
    }

    /// Drop the token and leave the authenticated state
    pub fn logout(&self) {
        self.write(|inner| {
            let was_authenticated = inner.auth.authenticated;
            inner.login_seq += 1;
            inner.token = None;
            inner.auth.loading = false;
            inner.set_authenticated(false);
            if was_authenticated {
                info!("Session ended (epoch {})", inner.epoch);
            }
        });
    }

    /// Log out if the held token has expired. Returns true when it did.
    pub fn expire_if_needed(&self) -> bool {
        let expired = self.read(|inner| inner.token.as_ref().is_some_and(SessionToken::is_expired));
        if expired {
            warn!("Session token expired");
            self.logout();
        }
        expired
    }

    /// Capture a ticket for a poll, or `None` when polling is gated off
    pub fn ticket(&self) -> Option<PollTicket> {
        if self.expire_if_needed() {
            return None;
        }
        self.read(|inner| {
            if !inner.auth.authenticated || inner.auth.loading {
                return None;
            }
            inner.token.as_ref().map(|token| PollTicket {
                epoch: inner.epoch,
                token: token.secret().clone(),
            })
        })
    }

    /// Whether a response fetched under `ticket` may still be applied
    pub fn is_current(&self, ticket: &PollTicket) -> bool {
        self.read(|inner| inner.auth.authenticated && inner.epoch == ticket.epoch)
    }

    fn read<T>(&self, f: impl FnOnce(&SessionInner) -> T) -> T {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        f(&inner)
    }

    fn write<T>(&self, f: impl FnOnce(&mut SessionInner) -> T) -> T {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        f(&mut inner)
    }
}

/// Accepts every token; for tests and offline use
pub struct AcceptAll;

#[async_trait]
impl SessionValidator for AcceptAll {
    async fn validate(&self, _token: &SecretString) -> Result<(), AgentError> {
        Ok(())
    }
}
