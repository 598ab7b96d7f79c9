//! Sign Up Use Case
//!
//! Creates a new unverified identity and dispatches the verification
//! link.

use std::sync::Arc;

use platform::token::TokenSigner;

use crate::application::config::AuthConfig;
use crate::domain::dispatcher::MailDispatcher;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{
    claims::VerificationClaims, display_name::DisplayName, email::Email,
    password::{PasswordDigest, RawPassword},
    role::Role,
};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Sign up output
pub struct SignUpOutput {
    pub identity_id: String,
    pub email: String,
}

/// Sign up use case
pub struct SignUpUseCase<R, M>
where
    R: IdentityRepository,
    M: MailDispatcher,
{
    repo: Arc<R>,
    mailer: Arc<M>,
    signer: Arc<TokenSigner>,
    config: Arc<AuthConfig>,
}

impl<R, M> SignUpUseCase<R, M>
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

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        // Validate signup fields
        let name = DisplayName::new(input.name)
            .map_err(|e| AuthError::InvalidInput(e.message().to_string()))?;
        let email = Email::new(input.email)
            .map_err(|e| AuthError::InvalidInput(e.message().to_string()))?;
        let role = Role::parse(&input.role)
            .ok_or_else(|| AuthError::InvalidInput(format!("Unknown role: {}", input.role)))?;

        // Pre-check; the store's unique constraint remains authoritative
        // when two signups race past this point.
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        // Validate and hash password
        let raw_password = RawPassword::new(input.password)
            .map_err(|e| AuthError::PasswordRejected(e.message().to_string()))?;
        let password_hash = PasswordDigest::from_raw(&raw_password, self.config.pepper())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        // Issue the one-shot verification token
        let claims = VerificationClaims::new(&email, self.config.verification_ttl);
        let token = self
            .signer
            .issue(&claims)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let identity = Identity::new(name, email, role, password_hash, token.clone());

        self.repo.insert(&identity).await?;

        // Mail delivery is best-effort; the signup already succeeded.
        let link = self.config.verification_link(&token);
        let body = verification_email_body(identity.name.as_str(), &link);
        if let Err(e) = self
            .mailer
            .send(
                identity.email.as_str(),
                "Email Verification - Student Portal",
                &body,
            )
            .await
        {
            tracing::warn!(
                error = %e,
                identity_id = %identity.identity_id,
                "Failed to dispatch verification email"
            );
        }

        tracing::info!(
            identity_id = %identity.identity_id,
            role = %identity.role,
            "Account registered, verification pending"
        );

        Ok(SignUpOutput {
            identity_id: identity.identity_id.to_string(),
            email: identity.email.as_str().to_string(),
        })
    }
}

fn verification_email_body(name: &str, link: &str) -> String {
    format!(
        "<p>Hi {},</p>\
         <p>Welcome to the Student Portal! Please verify your email by clicking the link below:</p>\
         <a href=\"{}\">Verify Email</a>\
         <p>This link will expire in 1 hour.</p>\
         <p>If you did not sign up, please ignore this email.</p>",
        name, link
    )
}
