//! Password hashing and verification
//!
//! Passwords are hashed as `plaintext ‖ salt` with bcrypt at the
//! default cost. The salt travels with the user record and is
//! independent of bcrypt's own internal salting.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use rand::RngCore;

use crate::error::{CoreError, CoreResult};
use crate::validation::validate_password;

/// Salt length in bytes.
pub const SALT_LEN: usize = 60;

/// Generate a fresh random salt.
///
/// Panics only if the system randomness source is unavailable, an
/// unrecoverable startup-class condition.
pub fn generate_salt() -> Vec<u8> {
    let mut salt = vec![0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

/// URL-safe random string built from `len` random bytes.
pub fn random_urlsafe(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE.encode(bytes)
}

fn salted(plaintext: &str, salt: &[u8]) -> Vec<u8> {
    let mut input = plaintext.as_bytes().to_vec();
    input.extend_from_slice(salt);
    input
}

/// Hash a plaintext password with the given salt. The length check is
/// a precondition; nothing is hashed for a too-short password.
pub fn hash_password(plaintext: &str, salt: &[u8]) -> CoreResult<Vec<u8>> {
    validate_password(plaintext)?;
    let hash = bcrypt::hash(salted(plaintext, salt), bcrypt::DEFAULT_COST)
        .map_err(|e| CoreError::Credential(e.to_string()))?;
    Ok(hash.into_bytes())
}

/// Verify a plaintext password against a stored hash.
///
/// Comparison goes through bcrypt's own verify, which compares in
/// constant time; never compare hashes byte-by-byte here.
pub fn verify_password(plaintext: &str, salt: &[u8], stored_hash: &[u8]) -> CoreResult<()> {
    let hash =
        std::str::from_utf8(stored_hash).map_err(|e| CoreError::Credential(e.to_string()))?;
    let ok = bcrypt::verify(salted(plaintext, salt), hash)
        .map_err(|e| CoreError::Credential(e.to_string()))?;
    if ok {
        Ok(())
    } else {
        Err(CoreError::InvalidCredentials)
    }
}
