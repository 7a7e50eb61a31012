//! Hachage et vérification des mots de passe

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHashString, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};
use derive_more::Display;
use once_cell::sync::Lazy;
use std::str::FromStr;
use thiserror::Error;

static DEFAULT_HASHER: Lazy<Argon2<'static>> = Lazy::new(Argon2::default);

/// Le haché d'un mot de passe vide, à utiliser quand l'utilisateur n'existe pas
/// pour éviter une attaque par canal auxiliaire
static EMPTY_HASH: Lazy<Option<PWHash>> = Lazy::new(|| hash("").ok());

#[derive(Debug, Error)]
#[error("Password hashing failed: {0}")]
pub struct HashError(String);

/// Un mot de passe haché, au format PHC
#[derive(Clone, Debug, Display)]
pub struct PWHash(PasswordHashString);

impl PWHash {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for PWHash {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PasswordHashString::from_str(s)
            .map(PWHash)
            .map_err(|e| HashError(e.to_string()))
    }
}

/// Calcule un haché à partir d'un mot de passe en clair, en choisissant un sel au hasard
pub fn hash(password: &str) -> Result<PWHash, HashError> {
    let salt = SaltString::generate(&mut OsRng);

    // Hash the password with Argon2id with the generated salt
    let hash = DEFAULT_HASHER
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| HashError(e.to_string()))?
        .serialize();

    Ok(PWHash(hash))
}

/// Vérifie si le mot de passe correspond au haché stocké.
///
/// Si un haché n'est pas fourni, on teste quand même le mot de passe
/// avec un faux haché pour éviter une timing attack.
pub fn verify(password: &str, maybe_hash: Option<&PWHash>) -> bool {
    match (maybe_hash, EMPTY_HASH.as_ref()) {
        (Some(hash), _) => check(password, hash),
        (None, Some(dummy)) => {
            // The outcome is discarded, only the work matters
            let _ = check(password, dummy);
            false
        }
        (None, None) => false,
    }
}

fn check(password: &str, hash: &PWHash) -> bool {
    // Argon2's comparison is constant-time
    DEFAULT_HASHER
        .verify_password(password.as_bytes(), &hash.0.password_hash())
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_salted() {
        let first = hash("12345").unwrap();
        let second = hash("12345").unwrap();

        assert_ne!(first.as_str(), second.as_str());
        assert!(verify("12345", Some(&first)));
        assert!(verify("12345", Some(&second)));
    }

    #[test]
    fn test_hash_never_contains_plaintext() {
        let hashed = hash("correct horse battery staple").unwrap();
        assert!(hashed.as_str().starts_with("$argon2id$"));
        assert!(!hashed.as_str().contains("correct horse"));
    }

    #[test]
    fn test_wrong_password() {
        let hashed = hash("12345").unwrap();
        assert!(!verify("123456", Some(&hashed)));
        assert!(!verify("", Some(&hashed)));
    }

    #[test]
    fn test_unknown_user_never_verifies() {
        // Even the empty password must not match the dummy hash
        assert!(!verify("", None));
        assert!(!verify("12345", None));
    }

    #[test]
    fn test_parse_stored_hash() {
        let hashed = hash("12345").unwrap();
        let parsed = PWHash::from_str(hashed.as_str()).unwrap();
        assert!(verify("12345", Some(&parsed)));
        assert!(PWHash::from_str("12345").is_err());
    }
}
