//! Credential hashing and verification.
//!
//! Passwords are stored as argon2id PHC strings. Student logins additionally
//! accept the holder's lowercase surname — the last whitespace-separated
//! token of the full name — which is also what an administrative password
//! reset installs as the stored credential.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::OsRng;

use crate::{Error, Result};

/// Hash a plaintext password into an argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| Error::Credential(e.to_string()))
}

/// Verify a plaintext password against a stored PHC string. Malformed hashes
/// verify as false rather than erroring; a corrupt credential must never let
/// anyone in.
pub fn verify_password(password: &str, hash: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(hash) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

/// The lowercase surname of `full_name` — its last whitespace-separated
/// token. `None` when the name is blank.
pub fn surname_token(full_name: &str) -> Option<String> {
  full_name
    .split_whitespace()
    .next_back()
    .map(str::to_lowercase)
}

/// The full student credential check: the stored hash, or the surname
/// fallback compared case-insensitively.
pub fn check_student_password(
  password: &str,
  hash: &str,
  full_name: &str,
) -> bool {
  if verify_password(password, hash) {
    return true;
  }
  surname_token(full_name).is_some_and(|t| t == password.to_lowercase())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_then_verify_roundtrip() {
    let hash = hash_password("secret").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("secret", &hash));
    assert!(!verify_password("wrong", &hash));
  }

  #[test]
  fn malformed_hash_never_verifies() {
    assert!(!verify_password("anything", "not-a-phc-string"));
    assert!(!verify_password("anything", ""));
  }

  #[test]
  fn surname_is_last_token_lowercased() {
    assert_eq!(surname_token("Jane Doe"), Some("doe".to_string()));
    assert_eq!(surname_token("Ada Obi Eze"), Some("eze".to_string()));
    assert_eq!(surname_token("  Jane   Doe  "), Some("doe".to_string()));
    assert_eq!(surname_token(""), None);
    assert_eq!(surname_token("   "), None);
  }

  #[test]
  fn student_check_accepts_hash_or_surname() {
    let hash = hash_password("secret").unwrap();
    assert!(check_student_password("secret", &hash, "Jane Doe"));
    assert!(check_student_password("doe", &hash, "Jane Doe"));
    assert!(check_student_password("DOE", &hash, "Jane Doe"));
    assert!(!check_student_password("wrong", &hash, "Jane Doe"));
  }
}
