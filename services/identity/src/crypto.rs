use argon2::password_hash::{PasswordHash, PasswordHasher as _, SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordVerifier};
use rand::RngExt;

use crate::domain::types::{CODE_LEN, SESSION_TOKEN_LEN};
use crate::error::IdentityError;

/// Charset for one-time codes (uppercase alphanumeric, easy to read aloud).
const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Charset for opaque session tokens.
const TOKEN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

fn random_string(charset: &[u8], len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| charset[rng.random_range(0..charset.len())] as char)
        .collect()
}

/// Generate a one-time verification/reset code.
pub fn generate_code() -> String {
    random_string(CODE_CHARSET, CODE_LEN)
}

/// Generate an opaque session identifier.
pub fn generate_session_token() -> String {
    random_string(TOKEN_CHARSET, SESSION_TOKEN_LEN)
}

/// One-way password hashing. Implementations must never log or persist the
/// plaintext.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, IdentityError>;

    fn verify(&self, password: &str, hash: &str) -> Result<bool, IdentityError>;
}

/// Argon2id hasher with the library's default parameters (19 MiB, 2
/// iterations). Salts are generated per hash; verification reads parameters
/// back from the stored PHC string.
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, IdentityError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| IdentityError::Internal(anyhow::anyhow!("hash password: {e}")))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, IdentityError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| IdentityError::Internal(anyhow::anyhow!("parse password hash: {e}")))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
