//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database and SMTP implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Account creation with email verification
//! - Stateless signed session tokens carried in an HttpOnly cookie
//! - Single-use, time-bound password-reset flow
//! - Role-based access (Admin, Student)
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, never stored in clear
//! - Session validity determined entirely by token signature + expiry
//! - Reset tokens double-checked against a server-side nonce, so a new
//!   request supersedes any earlier link
//! - Login failures are indistinguishable between unknown email and
//!   wrong password

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgIdentityRepository;
pub use infra::smtp::{SmtpConfig, SmtpMailer};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

#[cfg(test)]
mod tests;
