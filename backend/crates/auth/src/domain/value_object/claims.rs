//! Token Claims
//!
//! The small structured payloads embedded in signed tokens. Each claims
//! set carries its own `exp` (Unix seconds) derived from the TTL handed
//! in by the application layer; the signer validates it on the way back
//! in.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::identity::Identity;
use crate::domain::value_object::email::Email;

/// Claims for a session token: who is logged in, as what, until when.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Identity id
    pub sub: String,
    /// Email at login time
    pub email: String,
    /// Role code ("admin" / "student")
    pub role: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiry (Unix seconds)
    pub exp: i64,
}

impl SessionClaims {
    pub fn new(identity: &Identity, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: identity.identity_id.to_string(),
            email: identity.email.as_str().to_string(),
            role: identity.role.code().to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}

/// Claims for an email-verification token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationClaims {
    /// Address being verified
    pub email: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiry (Unix seconds)
    pub exp: i64,
}

impl VerificationClaims {
    pub fn new(email: &Email, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            email: email.as_str().to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}

/// Claims for a password-reset token.
///
/// Signature validity alone is not enough for this flow; the presented
/// token must also match the nonce currently stored on the identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetClaims {
    /// Unique token id; makes back-to-back requests produce distinct
    /// tokens so supersession is observable
    pub jti: String,
    /// Identity id
    pub sub: String,
    /// Address the reset was requested for
    pub email: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiry (Unix seconds)
    pub exp: i64,
}

impl ResetClaims {
    pub fn new(identity: &Identity, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            jti: uuid::Uuid::new_v4().to_string(),
            sub: identity.identity_id.to_string(),
            email: identity.email.as_str().to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}
