//! HTTP Handlers

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use std::sync::Arc;

use platform::token::TokenSigner;

use crate::application::config::AuthConfig;
use crate::application::{
    RequestResetUseCase, ResetPasswordUseCase, ResolveIdentityUseCase, SignInInput, SignInUseCase,
    SignUpInput, SignUpUseCase, VerifyEmailUseCase,
};
use crate::domain::dispatcher::MailDispatcher;
use crate::domain::repository::IdentityRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, ResetPasswordRequest,
    SessionStatusResponse, SignUpRequest, TokenQuery,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R, M>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
    M: MailDispatcher + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub mailer: Arc<M>,
    pub signer: Arc<TokenSigner>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /signup
pub async fn sign_up<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
    M: MailDispatcher + Clone + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(
        state.repo.clone(),
        state.mailer.clone(),
        state.signer.clone(),
        state.config.clone(),
    );

    let input = SignUpInput {
        name: req.name,
        email: req.email,
        password: req.password,
        role: req.role,
    };

    use_case.execute(input).await?;

    Ok(Json(MessageResponse {
        message: "Registration successful! Please check your email to verify your account."
            .to_string(),
    }))
}

// ============================================================================
// Email Verification
// ============================================================================

/// GET /verify-email?token=...
pub async fn verify_email<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Query(query): Query<TokenQuery>,
) -> AuthResult<Json<MessageResponse>>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
    M: MailDispatcher + Clone + Send + Sync + 'static,
{
    let use_case = VerifyEmailUseCase::new(state.repo.clone(), state.signer.clone());

    use_case.execute(&query.token).await?;

    Ok(Json(MessageResponse {
        message: "Email verified successfully! You can now log in.".to_string(),
    }))
}

// ============================================================================
// Login / Logout
// ============================================================================

/// POST /login
pub async fn login<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
    M: MailDispatcher + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.signer.clone(),
        state.config.clone(),
    );

    let input = SignInInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    let cookie = state
        .config
        .session_cookie()
        .build_set_cookie(&output.session_token);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            role: output.role.code().to_string(),
        }),
    ))
}

/// POST /logout
///
/// Logout is purely client-side cookie deletion; there is no
/// server-side token state to revoke.
pub async fn logout<R, M>(State(state): State<AuthAppState<R, M>>) -> impl IntoResponse
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
    M: MailDispatcher + Clone + Send + Sync + 'static,
{
    let cookie = state.config.session_cookie().build_delete_cookie();

    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)])
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /status
pub async fn session_status<R, M>(
    State(state): State<AuthAppState<R, M>>,
    headers: HeaderMap,
) -> Json<SessionStatusResponse>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
    M: MailDispatcher + Clone + Send + Sync + 'static,
{
    let token = extract_session_cookie(&headers, &state.config.session_cookie_name);

    let use_case = ResolveIdentityUseCase::new(state.signer.clone());

    match use_case.resolve(token.as_deref()) {
        Some(identity) => Json(SessionStatusResponse {
            authenticated: true,
            identity_id: Some(identity.identity_id),
            email: Some(identity.email),
            role: Some(identity.role.code().to_string()),
            expires_at: Some(identity.expires_at),
        }),
        None => Json(SessionStatusResponse {
            authenticated: false,
            identity_id: None,
            email: None,
            role: None,
            expires_at: None,
        }),
    }
}

// ============================================================================
// Password Reset
// ============================================================================

/// POST /forgot-password
pub async fn forgot_password<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<ForgotPasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
    M: MailDispatcher + Clone + Send + Sync + 'static,
{
    let use_case = RequestResetUseCase::new(
        state.repo.clone(),
        state.mailer.clone(),
        state.signer.clone(),
        state.config.clone(),
    );

    use_case.execute(&req.email).await?;

    // Identical message whether or not the account exists
    Ok(Json(MessageResponse {
        message: "If an account with that email exists, we've sent a reset link.".to_string(),
    }))
}

/// GET /reset-password?token=...
///
/// The render step: validates the link before the client shows the
/// new-password form.
pub async fn reset_password_page<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Query(query): Query<TokenQuery>,
) -> AuthResult<Json<MessageResponse>>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
    M: MailDispatcher + Clone + Send + Sync + 'static,
{
    let use_case = ResetPasswordUseCase::new(
        state.repo.clone(),
        state.signer.clone(),
        state.config.clone(),
    );

    use_case.resolve_request(&query.token).await?;

    Ok(Json(MessageResponse {
        message: "Reset link verified. You may choose a new password.".to_string(),
    }))
}

/// POST /reset-password
pub async fn reset_password<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<ResetPasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: IdentityRepository + Clone + Send + Sync + 'static,
    M: MailDispatcher + Clone + Send + Sync + 'static,
{
    let use_case = ResetPasswordUseCase::new(
        state.repo.clone(),
        state.signer.clone(),
        state.config.clone(),
    );

    use_case.complete(&req.token, req.new_password).await?;

    Ok(Json(MessageResponse {
        message: "Password reset successful! You can now log in with your new password."
            .to_string(),
    }))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn extract_session_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    platform::cookie::extract_cookie(headers, name)
}
