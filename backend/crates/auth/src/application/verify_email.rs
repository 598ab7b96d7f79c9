//! Verify Email Use Case
//!
//! Consumes a verification token and flips the identity to verified.

use std::sync::Arc;

use platform::token::TokenSigner;

use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{claims::VerificationClaims, email::Email};
use crate::error::{AuthError, AuthResult};

/// Verify email use case
pub struct VerifyEmailUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
    signer: Arc<TokenSigner>,
}

impl<R> VerifyEmailUseCase<R>
where
    R: IdentityRepository,
{
    pub fn new(repo: Arc<R>, signer: Arc<TokenSigner>) -> Self {
        Self { repo, signer }
    }

    /// Consume a verification link token
    ///
    /// Signature or expiry failure, and a token whose address no longer
    /// resolves to an identity, all collapse to `InvalidLink`.
    /// Re-submitting an already-consumed token passes the stateless
    /// signature check and re-applies the update harmlessly; verified
    /// stays verified.
    pub async fn execute(&self, token: &str) -> AuthResult<()> {
        let claims: VerificationClaims = self
            .signer
            .verify(token)
            .map_err(|_| AuthError::InvalidLink)?;

        let email = Email::from_db(claims.email);

        let mut identity = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidLink)?;

        identity.mark_verified();

        self.repo
            .update_verification(
                &identity.identity_id,
                identity.is_verified,
                identity.verification_token.as_deref(),
            )
            .await?;

        tracing::info!(
            identity_id = %identity.identity_id,
            "Email verified"
        );

        Ok(())
    }
}
