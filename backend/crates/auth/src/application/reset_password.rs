//! Reset Password Use Case
//!
//! Consumes a reset token to rotate the password hash. Validity needs
//! both a good signature and an exact match against the stored nonce,
//! which is what makes reset links revocable: a newer request or a
//! completed reset leaves older tokens signature-valid but dead.

use std::sync::Arc;

use platform::token::TokenSigner;

use crate::application::config::AuthConfig;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{
    claims::ResetClaims, email::Email,
    password::{PasswordDigest, RawPassword},
};
use crate::error::{AuthError, AuthResult};

/// Reset password use case
pub struct ResetPasswordUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
    signer: Arc<TokenSigner>,
    config: Arc<AuthConfig>,
}

impl<R> ResetPasswordUseCase<R>
where
    R: IdentityRepository,
{
    pub fn new(repo: Arc<R>, signer: Arc<TokenSigner>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            signer,
            config,
        }
    }

    /// Validate a reset link before showing the new-password form
    pub async fn resolve_request(&self, token: &str) -> AuthResult<()> {
        self.locate(token).await.map(|_| ())
    }

    /// Consume the reset token and rotate the password
    ///
    /// On any failure the credential is left untouched.
    pub async fn complete(&self, token: &str, new_password: String) -> AuthResult<()> {
        let mut identity = self.locate(token).await?;

        let raw_password = RawPassword::new(new_password)
            .map_err(|e| AuthError::PasswordRejected(e.message().to_string()))?;
        let new_hash = PasswordDigest::from_raw(&raw_password, self.config.pepper())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        identity.apply_password_reset(new_hash);

        self.repo
            .update_password(&identity.identity_id, &identity.password_hash)
            .await?;
        self.repo
            .update_reset_token(&identity.identity_id, identity.reset_token.as_deref())
            .await?;

        tracing::info!(
            identity_id = %identity.identity_id,
            "Password reset completed"
        );

        Ok(())
    }

    /// The dual check: signature + stored-nonce match
    async fn locate(&self, token: &str) -> AuthResult<Identity> {
        let claims: ResetClaims = self
            .signer
            .verify(token)
            .map_err(|_| AuthError::InvalidLink)?;

        let email = Email::from_db(claims.email);

        let identity = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidLink)?;

        // Signature-valid but superseded or never-issued tokens fail here
        if !identity.matches_reset_token(token) {
            return Err(AuthError::InvalidLink);
        }

        Ok(identity)
    }
}
