//! Resolve Identity Use Case
//!
//! Turns a cookie token into the current authenticated identity, or
//! anonymous. Pure token verification; the store is never consulted.

use std::sync::Arc;

use platform::token::TokenSigner;

use crate::domain::value_object::{claims::SessionClaims, role::Role};

/// The authenticated identity carried by a valid session token
#[derive(Debug, Clone)]
pub struct CurrentIdentity {
    pub identity_id: String,
    pub email: String,
    pub role: Role,
    /// Session expiry (Unix seconds)
    pub expires_at: i64,
}

/// Resolve identity use case
pub struct ResolveIdentityUseCase {
    signer: Arc<TokenSigner>,
}

impl ResolveIdentityUseCase {
    pub fn new(signer: Arc<TokenSigner>) -> Self {
        Self { signer }
    }

    /// Resolve a session cookie value to the current identity
    ///
    /// An absent, expired, or forged token resolves to `None` —
    /// "not logged in" — never an error.
    pub fn resolve(&self, cookie_token: Option<&str>) -> Option<CurrentIdentity> {
        let token = cookie_token?;
        let claims: SessionClaims = self.signer.verify(token).ok()?;
        let role = Role::parse(&claims.role)?;

        Some(CurrentIdentity {
            identity_id: claims.sub,
            email: claims.email,
            role,
            expires_at: claims.exp,
        })
    }
}
