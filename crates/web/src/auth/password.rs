//! Salted password digests, stored as `hex(salt)$hex(sha256(salt || password))`.

use sha2::{Digest, Sha256};
use uuid::Uuid;

pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4();
    digest_with_salt(salt.as_bytes(), password)
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, _)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    digest_with_salt(&salt, password) == stored
}

fn digest_with_salt(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    format!("{}${}", hex::encode(salt), hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_the_original_password() {
        let digest = hash_password("test123test");
        assert!(verify_password("test123test", &digest));
    }

    #[test]
    fn verify_rejects_a_wrong_password() {
        let digest = hash_password("test123test");
        assert!(!verify_password("nope", &digest));
    }

    #[test]
    fn digests_are_salted() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn malformed_digests_never_verify() {
        assert!(!verify_password("anything", ""));
        assert!(!verify_password("anything", "no-dollar-sign"));
        assert!(!verify_password("anything", "zzzz$abcd"));
    }
}
