//! Infrastructure Layer
//!
//! Database and external service integrations.

pub mod postgres;
pub mod smtp;

pub use postgres::PgIdentityRepository;
pub use smtp::{SmtpConfig, SmtpMailer};
