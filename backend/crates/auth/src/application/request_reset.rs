//! Request Reset Use Case
//!
//! Issues a single-use, time-bound reset token and dispatches the reset
//! link. The outward result is identical whether or not the account
//! exists.

use std::sync::Arc;

use platform::token::TokenSigner;

use crate::application::config::AuthConfig;
use crate::domain::dispatcher::MailDispatcher;
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{claims::ResetClaims, email::Email};
use crate::error::{AuthError, AuthResult};

/// Request reset use case
pub struct RequestResetUseCase<R, M>
where
    R: IdentityRepository,
    M: MailDispatcher,
{
    repo: Arc<R>,
    mailer: Arc<M>,
    signer: Arc<TokenSigner>,
    config: Arc<AuthConfig>,
}

impl<R, M> RequestResetUseCase<R, M>
where
    R: IdentityRepository,
    M: MailDispatcher,
{
    pub fn new(
        repo: Arc<R>,
        mailer: Arc<M>,
        signer: Arc<TokenSigner>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            repo,
            mailer,
            signer,
            config,
        }
    }

    /// Begin a password reset for the given address
    ///
    /// Unknown and malformed addresses return success with no side
    /// effects, so the response cannot be used to probe for accounts.
    pub async fn execute(&self, email: &str) -> AuthResult<()> {
        let Ok(email) = Email::new(email) else {
            tracing::debug!("Password reset requested for malformed address");
            return Ok(());
        };

        let Some(mut identity) = self.repo.find_by_email(&email).await? else {
            tracing::debug!("Password reset requested for unknown address");
            return Ok(());
        };

        // A fresh token supersedes any earlier request: only the stored
        // nonce passes the completion check.
        let claims = ResetClaims::new(&identity, self.config.reset_ttl);
        let token = self
            .signer
            .issue(&claims)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        identity.set_reset_token(token.clone());
        self.repo
            .update_reset_token(&identity.identity_id, identity.reset_token.as_deref())
            .await?;

        let link = self.config.reset_link(&token);
        let body = reset_email_body(identity.name.as_str(), &link);
        if let Err(e) = self
            .mailer
            .send(
                identity.email.as_str(),
                "Password Reset - Student Portal",
                &body,
            )
            .await
        {
            tracing::warn!(
                error = %e,
                identity_id = %identity.identity_id,
                "Failed to dispatch reset email"
            );
        }

        tracing::info!(
            identity_id = %identity.identity_id,
            "Password reset requested"
        );

        Ok(())
    }
}

fn reset_email_body(name: &str, link: &str) -> String {
    format!(
        "<p>Hi {},</p>\
         <p>You requested a password reset for your Student Portal account.</p>\
         <p>Click the link below to reset your password:</p>\
         <a href=\"{}\">Reset Password</a>\
         <p>This link will expire in 1 hour.</p>\
         <p>If you didn't request this reset, please ignore this email.</p>",
        name, link
    )
}
