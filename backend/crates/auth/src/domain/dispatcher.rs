//! Mail Dispatcher Trait
//!
//! Outbound mail is an external collaborator: the core builds the link
//! and message content, the dispatcher owns transport. Delivery failure
//! is non-fatal to the flows; callers log it and move on.

use thiserror::Error;

/// Mail dispatch errors
#[derive(Debug, Error)]
pub enum MailError {
    /// Recipient or sender address could not be parsed
    #[error("invalid mail address: {0}")]
    Address(String),

    /// Message could not be assembled
    #[error("could not build message: {0}")]
    Message(String),

    /// Transport-level delivery failure
    #[error("delivery failed: {0}")]
    Transport(String),
}

/// Mail dispatcher trait
#[trait_variant::make(MailDispatcher: Send)]
pub trait LocalMailDispatcher {
    /// Deliver an HTML message to a single recipient
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError>;
}
