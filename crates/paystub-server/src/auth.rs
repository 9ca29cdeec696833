//! HTTP Basic authentication against a single static credential pair.
//!
//! The password is argon2-hashed once at startup; requests are checked
//! through the argon2 verifier, which compares in constant time.

use actix_web::http::header;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password hash: {0}")]
    Hash(String),
}

/// The verification capability handed to the request path. Holds no
/// plaintext password.
pub struct Credentials {
    username: String,
    password_hash: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Result<Self, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|error| AuthError::Hash(error.to_string()))?
            .to_string();
        Ok(Self {
            username: username.to_string(),
            password_hash,
        })
    }

    /// Verify a username/password pair.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        if username != self.username {
            return false;
        }
        let Ok(parsed) = PasswordHash::new(&self.password_hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Verify the `Authorization: Basic …` header of a request, if any.
    pub fn verify_header(&self, headers: &header::HeaderMap) -> bool {
        let Some(value) = headers.get(header::AUTHORIZATION) else {
            return false;
        };
        let Ok(value) = value.to_str() else {
            return false;
        };
        let Some(encoded) = value.strip_prefix("Basic ") else {
            return false;
        };
        let Ok(decoded) = BASE64.decode(encoded.trim()) else {
            return false;
        };
        let Ok(pair) = String::from_utf8(decoded) else {
            return false;
        };
        let Some((username, password)) = pair.split_once(':') else {
            return false;
        };
        self.verify(username, password)
    }
}
