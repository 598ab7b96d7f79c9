//! Signed Token Issuance and Verification
//!
//! Stateless, tamper-evident tokens: a compact HS256-signed string
//! carrying a small claims payload with an embedded expiry. Validity is
//! fully determined by signature plus expiry; flows that need
//! revocability layer a server-side nonce check on top.
//!
//! The signing secret is injected once at construction and read-only
//! afterwards.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Clock skew tolerance applied during expiry checks
const LEEWAY_SECONDS: u64 = 30;

/// Typed rejection for token verification
///
/// Callers that do not care about the distinction collapse both
/// variants into a single "invalid" outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Signature is valid but the embedded expiry has passed
    #[error("token expired")]
    Expired,

    /// Malformed, forged, or otherwise unverifiable token
    #[error("token invalid")]
    Invalid,

    /// Claims could not be encoded
    #[error("token could not be signed: {0}")]
    Signing(String),
}

/// Issues and verifies signed claim tokens with a process-wide secret.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenSigner {
    /// Create a signer from the process-wide secret
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = LEEWAY_SECONDS;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Create a signer with a random secret (for development and tests)
    ///
    /// Tokens issued by one such signer are worthless to any other.
    pub fn from_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut secret);
        Self::new(&secret)
    }

    /// Encode and sign a claims payload
    ///
    /// The claims type must serialize an `exp` field (Unix seconds) for
    /// verification to succeed later.
    pub fn issue<T: Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        encode(&Header::default(), claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature integrity and expiry, returning the claims
    pub fn verify<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenError> {
        decode::<T>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}
