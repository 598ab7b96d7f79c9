//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing (Argon2id, zeroized clear text)
//! - Signed token issuance and verification (HS256)
//! - Cookie management

pub mod cookie;
pub mod password;
pub mod token;
