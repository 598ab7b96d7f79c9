//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use platform::token::TokenSigner;

use crate::application::config::AuthConfig;
use crate::domain::dispatcher::MailDispatcher;
use crate::domain::repository::IdentityRepository;
use crate::infra::postgres::PgIdentityRepository;
use crate::infra::smtp::SmtpMailer;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router with PostgreSQL repository and SMTP dispatcher
pub fn auth_router(
    repo: PgIdentityRepository,
    mailer: SmtpMailer,
    signer: TokenSigner,
    config: AuthConfig,
) -> Router {
    auth_router_generic(repo, mailer, signer, config)
}

/// Create a generic Auth router for any repository/dispatcher implementation
pub fn auth_router_generic<R, M>(
    repo: R,
    mailer: M,
    signer: TokenSigner,
    config: AuthConfig,
) -> Router
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
    M: MailDispatcher + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        mailer: Arc::new(mailer),
        signer: Arc::new(signer),
        config: Arc::new(config),
    };

    Router::new()
        .route("/signup", post(handlers::sign_up::<R, M>))
        .route("/verify-email", get(handlers::verify_email::<R, M>))
        .route("/login", post(handlers::login::<R, M>))
        .route("/logout", post(handlers::logout::<R, M>))
        .route("/status", get(handlers::session_status::<R, M>))
        .route("/forgot-password", post(handlers::forgot_password::<R, M>))
        .route(
            "/reset-password",
            get(handlers::reset_password_page::<R, M>).post(handlers::reset_password::<R, M>),
        )
        .with_state(state)
}
