//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{
    display_name::DisplayName, email::Email, identity_id::IdentityId, password::PasswordDigest,
    role::Role,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed identity repository
#[derive(Clone)]
pub struct PgIdentityRepository {
    pool: PgPool,
}

impl PgIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl IdentityRepository for PgIdentityRepository {
    async fn insert(&self, identity: &Identity) -> AuthResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO identities (
                identity_id,
                name,
                email,
                role,
                password_hash,
                is_verified,
                verification_token,
                reset_token,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(identity.identity_id.as_uuid())
        .bind(identity.name.as_str())
        .bind(identity.email.as_str())
        .bind(identity.role.code())
        .bind(identity.password_hash.as_phc_string())
        .bind(identity.is_verified)
        .bind(&identity.verification_token)
        .bind(&identity.reset_token)
        .bind(identity.created_at)
        .bind(identity.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            // The unique constraint on email is authoritative for the
            // signup race; two racing inserts both pass the pre-check,
            // only one lands.
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AuthError::DuplicateEmail)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT
                identity_id,
                name,
                email,
                role,
                password_hash,
                is_verified,
                verification_token,
                reset_token,
                created_at,
                updated_at
            FROM identities
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_identity()).transpose()
    }

    async fn update_verification(
        &self,
        id: &IdentityId,
        verified: bool,
        token: Option<&str>,
    ) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE identities SET
                is_verified = $2,
                verification_token = $3,
                updated_at = $4
            WHERE identity_id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(verified)
        .bind(token)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_password(&self, id: &IdentityId, digest: &PasswordDigest) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE identities SET
                password_hash = $2,
                updated_at = $3
            WHERE identity_id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(digest.as_phc_string())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_reset_token(&self, id: &IdentityId, token: Option<&str>) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE identities SET
                reset_token = $2,
                updated_at = $3
            WHERE identity_id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(token)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct IdentityRow {
    identity_id: Uuid,
    name: String,
    email: String,
    role: String,
    password_hash: String,
    is_verified: bool,
    verification_token: Option<String>,
    reset_token: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl IdentityRow {
    fn into_identity(self) -> AuthResult<Identity> {
        let role = Role::parse(&self.role)
            .ok_or_else(|| AuthError::Internal(format!("Invalid role in store: {}", self.role)))?;

        Ok(Identity {
            identity_id: IdentityId::from_uuid(self.identity_id),
            name: DisplayName::from_db(self.name),
            email: Email::from_db(self.email),
            role,
            password_hash: PasswordDigest::from_db(self.password_hash),
            is_verified: self.is_verified,
            verification_token: self.verification_token,
            reset_token: self.reset_token,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
