//! Auth Middleware
//!
//! Route guards for downstream handlers: both resolve the current
//! identity from the session cookie, one rejects anonymous requests.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use platform::token::TokenSigner;

use crate::application::ResolveIdentityUseCase;
use crate::application::config::AuthConfig;
use crate::application::resolve_identity::CurrentIdentity;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState {
    pub signer: Arc<TokenSigner>,
    pub config: Arc<AuthConfig>,
}

/// Middleware that requires an authenticated identity
///
/// Inserts [`CurrentIdentity`] into request extensions on success.
pub async fn require_identity(
    state: AuthMiddlewareState,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let token =
        platform::cookie::extract_cookie(req.headers(), &state.config.session_cookie_name);

    let use_case = ResolveIdentityUseCase::new(state.signer.clone());

    match use_case.resolve(token.as_deref()) {
        Some(identity) => {
            req.extensions_mut().insert(identity);
            Ok(next.run(req).await)
        }
        None => Err((StatusCode::UNAUTHORIZED, [("X-Auth-Required", "true")]).into_response()),
    }
}

/// Middleware that resolves the identity but doesn't require it
///
/// Inserts `Option<CurrentIdentity>` into request extensions for
/// handlers that render differently for anonymous visitors.
pub async fn attach_identity(
    state: AuthMiddlewareState,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token =
        platform::cookie::extract_cookie(req.headers(), &state.config.session_cookie_name);

    let use_case = ResolveIdentityUseCase::new(state.signer.clone());
    let identity: Option<CurrentIdentity> = use_case.resolve(token.as_deref());

    req.extensions_mut().insert(identity);

    next.run(req).await
}
