//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; application-level errors use
//! `kernel::error::AppError`.
//!
//! Process-wide configuration (signing secret, mail credentials, base
//! URL, environment flag) is loaded here once and injected read-only.

use auth::{AuthConfig, PgIdentityRepository, SmtpConfig, SmtpMailer, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use platform::token::TokenSigner;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Token signing secret
    let signer = match env::var("TOKEN_SECRET") {
        Ok(secret_b64) => {
            let secret = general_purpose::STANDARD.decode(&secret_b64)?;
            TokenSigner::new(&secret)
        }
        Err(_) if cfg!(debug_assertions) => {
            tracing::warn!("TOKEN_SECRET not set; using a random secret for this process");
            TokenSigner::from_random_secret()
        }
        Err(_) => {
            anyhow::bail!("TOKEN_SECRET must be set in production");
        }
    };

    // Auth configuration
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
    let mut config = if app_env == "production" {
        AuthConfig::default()
    } else {
        AuthConfig::development()
    };
    config.base_url = env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    if let Ok(pepper_b64) = env::var("PASSWORD_PEPPER") {
        config.password_pepper = Some(general_purpose::STANDARD.decode(&pepper_b64)?);
    }

    // Outbound mail
    let email_user = env::var("EMAIL_USER").unwrap_or_default();
    let mailer = SmtpMailer::new(SmtpConfig {
        host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
        port: env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(465),
        username: email_user.clone(),
        password: env::var("EMAIL_PASS").unwrap_or_default(),
        from_address: if email_user.is_empty() {
            "no-reply@localhost".to_string()
        } else {
            email_user
        },
    })
    .map_err(|e| anyhow::anyhow!("SMTP setup failed: {e}"))?;

    let repo = PgIdentityRepository::new(pool.clone());

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest("/api/auth", auth_router(repo, mailer, signer, config))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
