//! Flow tests for the auth crate
//!
//! Exercises the use cases end to end against an in-memory identity
//! store and a recording mail dispatcher.

use std::sync::{Arc, Mutex};

use chrono::Duration;

use platform::token::TokenSigner;

use crate::application::config::AuthConfig;
use crate::application::{
    RequestResetUseCase, ResetPasswordUseCase, ResolveIdentityUseCase, SignInInput, SignInUseCase,
    SignUpInput, SignUpUseCase, VerifyEmailUseCase,
};
use crate::domain::dispatcher::{MailDispatcher, MailError};
use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{
    email::Email, identity_id::IdentityId, password::PasswordDigest, role::Role,
};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Test Doubles
// ============================================================================

/// In-memory identity store
#[derive(Clone, Default)]
struct MemoryIdentityRepository {
    identities: Arc<Mutex<Vec<Identity>>>,
}

impl MemoryIdentityRepository {
    fn stored(&self, email: &str) -> Option<Identity> {
        self.identities
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.email.as_str() == email)
            .cloned()
    }

    fn count(&self) -> usize {
        self.identities.lock().unwrap().len()
    }
}

impl IdentityRepository for MemoryIdentityRepository {
    async fn insert(&self, identity: &Identity) -> AuthResult<()> {
        let mut rows = self.identities.lock().unwrap();
        // Unique constraint stand-in
        if rows.iter().any(|i| i.email == identity.email) {
            return Err(AuthError::DuplicateEmail);
        }
        rows.push(identity.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Identity>> {
        Ok(self
            .identities
            .lock()
            .unwrap()
            .iter()
            .find(|i| &i.email == email)
            .cloned())
    }

    async fn update_verification(
        &self,
        id: &IdentityId,
        verified: bool,
        token: Option<&str>,
    ) -> AuthResult<()> {
        let mut rows = self.identities.lock().unwrap();
        if let Some(identity) = rows.iter_mut().find(|i| &i.identity_id == id) {
            identity.is_verified = verified;
            identity.verification_token = token.map(str::to_string);
        }
        Ok(())
    }

    async fn update_password(&self, id: &IdentityId, digest: &PasswordDigest) -> AuthResult<()> {
        let mut rows = self.identities.lock().unwrap();
        if let Some(identity) = rows.iter_mut().find(|i| &i.identity_id == id) {
            identity.password_hash = digest.clone();
        }
        Ok(())
    }

    async fn update_reset_token(&self, id: &IdentityId, token: Option<&str>) -> AuthResult<()> {
        let mut rows = self.identities.lock().unwrap();
        if let Some(identity) = rows.iter_mut().find(|i| &i.identity_id == id) {
            identity.reset_token = token.map(str::to_string);
        }
        Ok(())
    }
}

/// Mail dispatcher that records instead of delivering
#[derive(Clone, Default)]
struct RecordingMailer {
    sent: Arc<Mutex<Vec<(String, String, String)>>>,
}

impl RecordingMailer {
    fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    fn last_body(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|m| m.2.clone())
    }
}

impl MailDispatcher for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError> {
        self.sent.lock().unwrap().push((
            to.to_string(),
            subject.to_string(),
            html_body.to_string(),
        ));
        Ok(())
    }
}

// ============================================================================
// Harness
// ============================================================================

struct Harness {
    repo: Arc<MemoryIdentityRepository>,
    mailer: Arc<RecordingMailer>,
    signer: Arc<TokenSigner>,
    config: Arc<AuthConfig>,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(AuthConfig::development())
    }

    fn with_config(config: AuthConfig) -> Self {
        Self {
            repo: Arc::new(MemoryIdentityRepository::default()),
            mailer: Arc::new(RecordingMailer::default()),
            signer: Arc::new(TokenSigner::new(b"flow-test-secret")),
            config: Arc::new(config),
        }
    }

    async fn sign_up(&self, name: &str, email: &str, password: &str, role: &str) -> AuthResult<()> {
        SignUpUseCase::new(
            self.repo.clone(),
            self.mailer.clone(),
            self.signer.clone(),
            self.config.clone(),
        )
        .execute(SignUpInput {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: role.to_string(),
        })
        .await
        .map(|_| ())
    }

    async fn verify_email(&self, token: &str) -> AuthResult<()> {
        VerifyEmailUseCase::new(self.repo.clone(), self.signer.clone())
            .execute(token)
            .await
    }

    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<crate::application::SignInOutput> {
        SignInUseCase::new(self.repo.clone(), self.signer.clone(), self.config.clone())
            .execute(SignInInput {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
    }

    async fn request_reset(&self, email: &str) -> AuthResult<()> {
        RequestResetUseCase::new(
            self.repo.clone(),
            self.mailer.clone(),
            self.signer.clone(),
            self.config.clone(),
        )
        .execute(email)
        .await
    }

    fn reset_use_case(&self) -> ResetPasswordUseCase<MemoryIdentityRepository> {
        ResetPasswordUseCase::new(self.repo.clone(), self.signer.clone(), self.config.clone())
    }

    fn resolver(&self) -> ResolveIdentityUseCase {
        ResolveIdentityUseCase::new(self.signer.clone())
    }

    /// Register and verify an account, ready for login
    async fn registered_account(&self, email: &str, password: &str) {
        self.sign_up("Alice", email, password, "student")
            .await
            .unwrap();
        let token = self
            .repo
            .stored(email)
            .unwrap()
            .verification_token
            .unwrap();
        self.verify_email(&token).await.unwrap();
    }
}

// ============================================================================
// Verification Flow
// ============================================================================

#[tokio::test]
async fn signup_then_verify_marks_account_verified() {
    let h = Harness::new();

    h.sign_up("Alice", "alice@example.com", "alice password", "student")
        .await
        .unwrap();

    let stored = h.repo.stored("alice@example.com").unwrap();
    assert!(!stored.is_verified);
    let token = stored.verification_token.expect("token persisted at signup");

    // The dispatched mail carries the verification link with the token
    assert_eq!(h.mailer.sent_count(), 1);
    assert!(h.mailer.last_body().unwrap().contains(&token));

    h.verify_email(&token).await.unwrap();

    let stored = h.repo.stored("alice@example.com").unwrap();
    assert!(stored.is_verified);
    assert!(stored.verification_token.is_none());
}

#[tokio::test]
async fn duplicate_email_signup_performs_no_mutation() {
    let h = Harness::new();

    h.sign_up("Alice", "alice@example.com", "alice password", "student")
        .await
        .unwrap();

    let err = h
        .sign_up("Mallory", "alice@example.com", "other password", "student")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::DuplicateEmail));
    assert_eq!(h.repo.count(), 1);
    assert_eq!(h.mailer.sent_count(), 1);
}

#[tokio::test]
async fn reverifying_a_consumed_token_is_harmless() {
    let h = Harness::new();

    h.sign_up("Alice", "alice@example.com", "alice password", "student")
        .await
        .unwrap();
    let token = h
        .repo
        .stored("alice@example.com")
        .unwrap()
        .verification_token
        .unwrap();

    h.verify_email(&token).await.unwrap();
    // Stateless signature still checks out; verified stays verified
    h.verify_email(&token).await.unwrap();

    assert!(h.repo.stored("alice@example.com").unwrap().is_verified);
}

#[tokio::test]
async fn garbage_verification_token_rejected() {
    let h = Harness::new();

    let err = h.verify_email("definitely-not-a-token").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidLink));
}

// ============================================================================
// Session Flow
// ============================================================================

#[tokio::test]
async fn login_before_verification_fails_with_unverified() {
    let h = Harness::new();

    h.sign_up("Alice", "alice@example.com", "alice password", "student")
        .await
        .unwrap();

    let err = h
        .sign_in("alice@example.com", "alice password")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unverified));
}

#[tokio::test]
async fn login_issues_a_resolvable_session_token() {
    let h = Harness::new();
    h.registered_account("alice@example.com", "alice password")
        .await;

    let output = h
        .sign_in("alice@example.com", "alice password")
        .await
        .unwrap();

    let identity = h
        .resolver()
        .resolve(Some(&output.session_token))
        .expect("fresh session token resolves");

    let stored = h.repo.stored("alice@example.com").unwrap();
    assert_eq!(identity.identity_id, stored.identity_id.to_string());
    assert_eq!(identity.email, "alice@example.com");
    assert_eq!(identity.role, Role::Student);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let h = Harness::new();
    h.registered_account("alice@example.com", "alice password")
        .await;

    let wrong_password = h
        .sign_in("alice@example.com", "not her password")
        .await
        .unwrap_err();
    let unknown_email = h
        .sign_in("nobody@example.com", "alice password")
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, AuthError::InvalidCredentials));
    assert!(matches!(unknown_email, AuthError::InvalidCredentials));
    // The outward message must not leak which half failed
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}

#[tokio::test]
async fn anonymous_resolution_for_absent_or_forged_tokens() {
    let h = Harness::new();

    assert!(h.resolver().resolve(None).is_none());
    assert!(h.resolver().resolve(Some("forged.token.value")).is_none());

    // Token signed by a different process secret
    let foreign = TokenSigner::new(b"some-other-secret");
    let h2 = Harness {
        signer: Arc::new(foreign),
        ..Harness::new()
    };
    h2.registered_account("alice@example.com", "alice password")
        .await;
    let output = h2
        .sign_in("alice@example.com", "alice password")
        .await
        .unwrap();

    assert!(h.resolver().resolve(Some(&output.session_token)).is_none());
}

#[tokio::test]
async fn expired_session_token_resolves_to_anonymous() {
    let h = Harness::with_config(AuthConfig {
        session_ttl: Duration::seconds(-120),
        ..AuthConfig::development()
    });
    h.registered_account("alice@example.com", "alice password")
        .await;

    let output = h
        .sign_in("alice@example.com", "alice password")
        .await
        .unwrap();

    assert!(h.resolver().resolve(Some(&output.session_token)).is_none());
}

// ============================================================================
// Password-Reset Flow
// ============================================================================

#[tokio::test]
async fn reset_flow_rotates_the_password() {
    let h = Harness::new();
    h.registered_account("alice@example.com", "old password")
        .await;

    h.request_reset("alice@example.com").await.unwrap();
    let token = h
        .repo
        .stored("alice@example.com")
        .unwrap()
        .reset_token
        .expect("nonce persisted server-side");
    assert!(h.mailer.last_body().unwrap().contains(&token));

    let reset = h.reset_use_case();
    reset.resolve_request(&token).await.unwrap();
    reset.complete(&token, "new password".to_string()).await.unwrap();

    // Old credential is gone, new one works
    assert!(matches!(
        h.sign_in("alice@example.com", "old password").await,
        Err(AuthError::InvalidCredentials)
    ));
    h.sign_in("alice@example.com", "new password").await.unwrap();
}

#[tokio::test]
async fn reset_token_is_single_use() {
    let h = Harness::new();
    h.registered_account("alice@example.com", "old password")
        .await;

    h.request_reset("alice@example.com").await.unwrap();
    let token = h
        .repo
        .stored("alice@example.com")
        .unwrap()
        .reset_token
        .unwrap();

    let reset = h.reset_use_case();
    reset.complete(&token, "first new".to_string()).await.unwrap();

    // Nonce was cleared; the same signature-valid token is now dead
    let err = reset
        .complete(&token, "second new".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidLink));

    // And the second attempt left the credential untouched
    h.sign_in("alice@example.com", "first new").await.unwrap();
}

#[tokio::test]
async fn newer_reset_request_supersedes_older() {
    let h = Harness::new();
    h.registered_account("alice@example.com", "old password")
        .await;

    h.request_reset("alice@example.com").await.unwrap();
    let first = h
        .repo
        .stored("alice@example.com")
        .unwrap()
        .reset_token
        .unwrap();

    h.request_reset("alice@example.com").await.unwrap();
    let second = h
        .repo
        .stored("alice@example.com")
        .unwrap()
        .reset_token
        .unwrap();

    assert_ne!(first, second);

    let reset = h.reset_use_case();
    assert!(matches!(
        reset.resolve_request(&first).await.unwrap_err(),
        AuthError::InvalidLink
    ));
    reset.resolve_request(&second).await.unwrap();
    reset.complete(&second, "new password".to_string()).await.unwrap();
}

#[tokio::test]
async fn expired_reset_token_rejected() {
    let h = Harness::with_config(AuthConfig {
        reset_ttl: Duration::seconds(-120),
        ..AuthConfig::development()
    });
    h.registered_account("alice@example.com", "old password")
        .await;

    h.request_reset("alice@example.com").await.unwrap();
    let token = h
        .repo
        .stored("alice@example.com")
        .unwrap()
        .reset_token
        .unwrap();

    // Stored nonce matches, but the embedded expiry has passed
    let err = h
        .reset_use_case()
        .complete(&token, "new password".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidLink));
}

#[tokio::test]
async fn unknown_email_reset_request_is_silent() {
    let h = Harness::new();

    h.request_reset("unknown@x.com").await.unwrap();

    assert_eq!(h.repo.count(), 0);
    assert_eq!(h.mailer.sent_count(), 0);
}

// ============================================================================
// End-to-End Scenario
// ============================================================================

#[tokio::test]
async fn full_signup_verify_login_scenario() {
    let h = Harness::new();

    h.sign_up("A", "a@x.com", "pw", "student").await.unwrap();

    let token = h.repo.stored("a@x.com").unwrap().verification_token.unwrap();
    h.verify_email(&token).await.unwrap();

    let output = h.sign_in("a@x.com", "pw").await.unwrap();
    assert_eq!(output.role, Role::Student);

    let identity = h
        .resolver()
        .resolve(Some(&output.session_token))
        .expect("cookie decodes to a live session");
    assert_eq!(identity.role, Role::Student);
    assert_eq!(identity.email, "a@x.com");
}
