//! Credentials and identity lookup.
//!
//! This crate provides:
//! - Argon2 password hashing and verification
//! - Bearer token minting and header parsing
//! - Sign-in (email + password → stable per-user token) and the reverse
//!   lookup from a token to the user it was issued to

pub mod credentials;
pub mod error;
pub mod password;

pub use {
    credentials::{SignIn, authenticate, bearer_token, generate_token, register, sign_in},
    error::{Error, Result},
    password::{hash_password, verify_password},
};
