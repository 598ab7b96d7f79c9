//! Identity Entity
//!
//! A stored account record: credentials, role, and the one-shot token
//! state driving the verification and reset flows.
//!
//! Lifecycle per identity:
//! - verification: Unregistered -> PendingVerification -> Verified
//! - reset: Normal -> PendingReset -> Normal

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    display_name::DisplayName, email::Email, identity_id::IdentityId, password::PasswordDigest,
    role::Role,
};

/// Identity entity
#[derive(Debug, Clone)]
pub struct Identity {
    /// Internal UUID identifier, immutable after creation
    pub identity_id: IdentityId,
    /// Display name captured at signup
    pub name: DisplayName,
    /// Unique lookup key, stored case-sensitively
    pub email: Email,
    /// Role, fixed at creation
    pub role: Role,
    /// Argon2id digest; always present, replaced wholesale on reset
    pub password_hash: PasswordDigest,
    /// Flipped true exactly once by the verification flow
    pub is_verified: bool,
    /// Set at signup; presence implies "pending verification"
    pub verification_token: Option<String>,
    /// Set by a reset request; presence implies "pending reset"
    pub reset_token: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Create a new unverified identity
    pub fn new(
        name: DisplayName,
        email: Email,
        role: Role,
        password_hash: PasswordDigest,
        verification_token: String,
    ) -> Self {
        let now = Utc::now();

        Self {
            identity_id: IdentityId::new(),
            name,
            email,
            role,
            password_hash,
            is_verified: false,
            verification_token: Some(verification_token),
            reset_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a verification link is still outstanding
    pub fn pending_verification(&self) -> bool {
        !self.is_verified
    }

    /// Complete email verification
    ///
    /// Re-applying to an already-verified identity changes nothing of
    /// consequence; verified stays verified.
    pub fn mark_verified(&mut self) {
        self.is_verified = true;
        self.verification_token = None;
        self.updated_at = Utc::now();
    }

    /// Store a freshly issued reset nonce, superseding any earlier one
    pub fn set_reset_token(&mut self, token: String) {
        self.reset_token = Some(token);
        self.updated_at = Utc::now();
    }

    /// Whether the presented token is exactly the stored reset nonce
    pub fn matches_reset_token(&self, token: &str) -> bool {
        self.reset_token.as_deref() == Some(token)
    }

    /// Rotate the password digest and consume the reset nonce
    pub fn apply_password_reset(&mut self, new_hash: PasswordDigest) {
        self.password_hash = new_hash;
        self.reset_token = None;
        self.updated_at = Utc::now();
    }
}
