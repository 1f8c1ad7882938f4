//! Password credential hashing and verification.
//!
//! Credentials are stored as `base64(salt)$base64(sha256(salt || password))`.
//! Hardening beyond a salted hash (KDF tuning, pepper, lockouts) is out of
//! scope here; the stored string stays opaque to every other module.

use base64::{engine::general_purpose::STANDARD as B64, Engine as _};
use rand::RngCore;
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
  let mut salt = [0u8; SALT_LEN];
  rand::thread_rng().fill_bytes(&mut salt);
  let digest = digest_with_salt(&salt, password);
  format!("{}${}", B64.encode(salt), B64.encode(digest))
}

/// Check a password against a stored credential string.
/// Any malformed stored value simply fails verification.
pub fn verify_password(stored: &str, password: &str) -> bool {
  let Some((salt_b64, digest_b64)) = stored.split_once('$') else {
    return false;
  };
  let (Ok(salt), Ok(expected)) = (B64.decode(salt_b64), B64.decode(digest_b64)) else {
    return false;
  };
  digest_with_salt(&salt, password).as_slice() == expected.as_slice()
}

fn digest_with_salt(salt: &[u8], password: &str) -> [u8; 32] {
  let mut hasher = Sha256::new();
  hasher.update(salt);
  hasher.update(password.as_bytes());
  hasher.finalize().into()
}
