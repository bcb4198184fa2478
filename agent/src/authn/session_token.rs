//! Session token handling

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::errors::AgentError;

/// Claims the agent reads from a backend-issued JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user id)
    #[serde(default)]
    pub sub: Option<serde_json::Value>,

    /// Expiration timestamp
    #[serde(default)]
    pub exp: Option<i64>,
}

/// A bearer token for the orchestrator backend
#[derive(Debug, Clone)]
pub struct SessionToken {
    raw: SecretString,
    claims: Option<SessionClaims>,
}

impl SessionToken {
    /// Wrap a raw bearer token. JWT claims are decoded without signature
    /// validation (the backend validates); opaque tokens carry no expiry.
    pub fn from_raw(raw: impl Into<String>) -> Result<Self, AgentError> {
        let raw: String = raw.into();
        let raw = raw.trim().to_string();
        if raw.is_empty() {
            return Err(AgentError::TokenError("Token is empty".to_string()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let claims = decode::<SessionClaims>(&raw, &DecodingKey::from_secret(b""), &validation)
            .ok()
            .map(|data| data.claims);

        Ok(Self {
            raw: SecretString::from(raw),
            claims,
        })
    }

    pub fn secret(&self) -> &SecretString {
        &self.raw
    }

    pub fn expose(&self) -> &str {
        self.raw.expose_secret()
    }

    /// Whether the token decoded as a JWT
    pub fn is_jwt(&self) -> bool {
        self.claims.is_some()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.claims
            .as_ref()
            .and_then(|c| c.exp)
            .and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|exp| exp <= now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
