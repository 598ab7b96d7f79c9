//! Sign In Use Case
//!
//! Validates credentials and issues a stateless session token.

use std::sync::Arc;

use platform::token::TokenSigner;

use crate::application::config::AuthConfig;
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{
    claims::SessionClaims, email::Email, password::RawPassword, role::Role,
};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    /// Session token for the cookie
    pub session_token: String,
    /// Identity id
    pub identity_id: String,
    /// Role, so the client can route to the right dashboard
    pub role: Role,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
    signer: Arc<TokenSigner>,
    config: Arc<AuthConfig>,
}

impl<R> SignInUseCase<R>
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

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        // A malformed address cannot belong to any account; collapse to
        // the same rejection as a lookup miss.
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let identity = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // Unverified accounts never complete the session flow
        if !identity.is_verified {
            return Err(AuthError::Unverified);
        }

        let raw_password =
            RawPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        if !identity
            .password_hash
            .verify(&raw_password, self.config.pepper())
        {
            return Err(AuthError::InvalidCredentials);
        }

        // No store mutation on login; the session lives in the token.
        let claims = SessionClaims::new(&identity, self.config.session_ttl);
        let session_token = self
            .signer
            .issue(&claims)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        tracing::info!(
            identity_id = %identity.identity_id,
            role = %identity.role,
            "Signed in"
        );

        Ok(SignInOutput {
            session_token,
            identity_id: identity.identity_id.to_string(),
            role: identity.role,
        })
    }
}
