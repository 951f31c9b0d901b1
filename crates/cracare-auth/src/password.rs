//! Password verification using Argon2id.

use argon2::{Argon2, PasswordVerifier};

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Verify a plaintext password against an Argon2id PHC-format hash.
///
/// `pepper` must match the one used during hashing. A malformed stored
/// hash is an error, a mismatch is `Ok(false)`.
pub fn verify_password(
    password: &str,
    hash: &str,
    pepper: Option<&str>,
) -> Result<bool, AuthError> {
    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{password}");
            peppered.as_bytes()
        }
        None => password.as_bytes(),
    };

    let parsed_hash = argon2::PasswordHash::new(hash)
        .map_err(|e| AuthError::Crypto(format!("invalid hash format: {e}")))?;

    match Argon2::default().verify_password(input, &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Crypto(format!("verify error: {e}"))),
    }
}

/// Reject passwords shorter than the configured minimum.
pub fn check_policy(password: &str, config: &AuthConfig) -> Result<(), AuthError> {
    if password.trim().chars().count() < config.min_password_length {
        return Err(AuthError::WeakPassword(config.min_password_length));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::PasswordHasher;
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;

    fn hash_password(password: &str, pepper: Option<&str>) -> String {
        let input = match pepper {
            Some(p) => format!("{p}{password}"),
            None => password.to_string(),
        };
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(input.as_bytes(), &salt)
            .expect("hashing failed")
            .to_string()
    }

    #[test]
    fn correct_password_matches() {
        let hash = hash_password("cuidados24", None);
        assert!(verify_password("cuidados24", &hash, None).unwrap());
    }

    #[test]
    fn wrong_password_does_not_match() {
        let hash = hash_password("cuidados24", None);
        assert!(!verify_password("cuidados25", &hash, None).unwrap());
    }

    #[test]
    fn pepper_is_applied() {
        let hash = hash_password("cuidados24", Some("sal"));
        assert!(verify_password("cuidados24", &hash, Some("sal")).unwrap());
        assert!(!verify_password("cuidados24", &hash, None).unwrap());
    }

    #[test]
    fn malformed_hash_returns_error() {
        assert!(verify_password("pw", "not-a-hash", None).is_err());
    }

    #[test]
    fn short_passwords_are_rejected() {
        let config = AuthConfig::default();
        assert!(check_policy("1234567", &config).is_err());
        assert!(check_policy("   1234567   ", &config).is_err());
        assert!(check_policy("12345678", &config).is_ok());
    }
}
