use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::Error as JwtError, DecodingKey, EncodingKey, Header,
    Validation,
};
use model::user::User;
use serde::{Deserialize, Serialize};
use utility::id::Id;

/// The payload carried inside an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id.
    pub sub: i64,
    /// Staff role flag.
    pub staff: bool,
    /// Expiry as a unix timestamp.
    pub exp: i64,
}

/// HS256 signing material plus the configured token lifetime.
#[derive(Clone)]
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl AuthKeys {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn issue(&self, user: Id<User>, is_staff: bool) -> Result<String, JwtError> {
        let claims = Claims {
            sub: user.raw(),
            staff: is_staff,
            exp: (Utc::now() + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Checks signature and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> AuthKeys {
        AuthKeys::new(b"test-secret", Duration::minutes(30))
    }

    #[test]
    fn issue_verify_roundtrip() {
        let keys = keys();
        let token = keys.issue(Id::new(42), true).unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, 42);
        assert!(claims.staff);
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = keys().issue(Id::new(1), false).unwrap();
        let other = AuthKeys::new(b"other-secret", Duration::minutes(30));
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let expired = AuthKeys::new(b"test-secret", Duration::minutes(-5));
        let token = expired.issue(Id::new(1), false).unwrap();
        assert!(keys().verify(&token).is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(keys().verify("not-a-token").is_err());
    }
}
