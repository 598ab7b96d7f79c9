//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.
//!
//! Identity-revealing distinctions are collapsed before they reach the
//! client: a login lookup miss and a wrong password both surface as
//! [`AuthError::InvalidCredentials`], and every verification or reset
//! token failure surfaces as [`AuthError::InvalidLink`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email is already registered
    #[error("Email already registered")]
    DuplicateEmail,

    /// Unknown email or wrong password; intentionally one message
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Account exists but the email was never verified
    #[error("Please verify your email before logging in")]
    Unverified,

    /// Verification or reset link failed signature, expiry, or nonce check
    #[error("Invalid or expired link")]
    InvalidLink,

    /// Rejected signup/reset field
    #[error("{0}")]
    InvalidInput(String),

    /// Password failed the acceptance policy
    #[error("Password not acceptable: {0}")]
    PasswordRejected(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::DuplicateEmail => StatusCode::CONFLICT,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Unverified => StatusCode::FORBIDDEN,
            AuthError::InvalidLink => StatusCode::GONE,
            AuthError::InvalidInput(_) | AuthError::PasswordRejected(_) => StatusCode::BAD_REQUEST,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::DuplicateEmail => ErrorKind::Conflict,
            AuthError::InvalidCredentials => ErrorKind::Unauthorized,
            AuthError::Unverified => ErrorKind::Forbidden,
            AuthError::InvalidLink => ErrorKind::Gone,
            AuthError::InvalidInput(_) | AuthError::PasswordRejected(_) => ErrorKind::BadRequest,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidLink => {
                tracing::warn!("Invalid or expired link presented");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::DuplicateEmail.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::Unverified.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AuthError::InvalidLink.status_code(), StatusCode::GONE);
    }

    #[test]
    fn test_credential_message_reveals_nothing() {
        // One variant for both failure causes means one outward message
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
    }
}
