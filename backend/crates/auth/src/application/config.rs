//! Application Configuration
//!
//! Configuration for the Auth application layer. Loaded once at process
//! start and shared read-only behind an `Arc`.

use chrono::Duration;

/// Re-export cookie types from platform
pub use platform::cookie::{CookieConfig, SameSite};

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// Session token TTL
    pub session_ttl: Duration,
    /// Email-verification token TTL
    pub verification_ttl: Duration,
    /// Password-reset token TTL
    pub reset_ttl: Duration,
    /// Whether to require the Secure cookie attribute
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Public origin used when building verification/reset links
    pub base_url: String,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "token".to_string(),
            session_ttl: Duration::hours(1),
            verification_ttl: Duration::hours(1),
            reset_ttl: Duration::hours(1),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            base_url: "http://localhost:3000".to_string(),
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Default::default()
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Link embedded in verification mail
    pub fn verification_link(&self, token: &str) -> String {
        format!("{}/verify-email?token={}", self.base_url, token)
    }

    /// Link embedded in reset mail
    pub fn reset_link(&self, token: &str) -> String {
        format!("{}/reset-password?token={}", self.base_url, token)
    }

    /// Cookie configuration for the session token
    pub fn session_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.session_ttl.num_seconds()),
        }
    }
}
