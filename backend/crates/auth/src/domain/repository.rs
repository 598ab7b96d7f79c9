//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::identity::Identity;
use crate::domain::value_object::{
    email::Email, identity_id::IdentityId, password::PasswordDigest,
};
use crate::error::AuthResult;

/// Credential store trait
///
/// Single-row reads and writes only; the store's unique constraint on
/// email is the authoritative duplicate-signup check.
#[trait_variant::make(IdentityRepository: Send)]
pub trait LocalIdentityRepository {
    /// Persist a new identity
    ///
    /// A unique-constraint rejection surfaces as `DuplicateEmail`.
    async fn insert(&self, identity: &Identity) -> AuthResult<()>;

    /// Find an identity by its email (exact, case-sensitive match)
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Identity>>;

    /// Update the verification flag and one-shot verification token
    async fn update_verification(
        &self,
        id: &IdentityId,
        verified: bool,
        token: Option<&str>,
    ) -> AuthResult<()>;

    /// Replace the password digest
    async fn update_password(&self, id: &IdentityId, digest: &PasswordDigest) -> AuthResult<()>;

    /// Set or clear the one-shot reset token
    async fn update_reset_token(&self, id: &IdentityId, token: Option<&str>) -> AuthResult<()>;
}
