use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const TOKEN_EXPIRY_HOURS: i64 = 1;

/// HS256 only. Every service on the platform shares the same `SECRET`, so a
/// key-pair scheme would buy nothing here.
const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims carried by every ClassConnect access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String,
    pub role: String,
    pub email: String,
    pub user_name: String,
    /// Expiration as a Unix timestamp.
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("token expired")]
    Expired,
    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
    #[error("failed to sign token: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),
}

/// Mint an access token for `user_id`, expiring in one hour.
pub fn generate_jwt(
    user_id: &str,
    role: &str,
    email: &str,
    user_name: &str,
    secret: &str,
) -> Result<String, JwtError> {
    let expiry = Utc::now() + Duration::hours(TOKEN_EXPIRY_HOURS);
    let claims = Claims {
        user_id: user_id.to_string(),
        role: role.to_string(),
        email: email.to_string(),
        user_name: user_name.to_string(),
        exp: expiry.timestamp(),
    };

    encode(
        &Header::new(JWT_ALGORITHM),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(JwtError::Sign)
}

/// Validate `token` and return its claims. Expiry is reported separately from
/// every other failure so callers can tell the client to re-authenticate.
pub fn parse_jwt(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let validation = Validation::new(JWT_ALGORITHM);

    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => Ok(data.claims),
        Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => Err(JwtError::Expired),
        Err(e) => Err(JwtError::Invalid(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn round_trip_preserves_claims() {
        let token = generate_jwt("42", "teacher", "ana@classconnect.io", "Ana", SECRET).unwrap();
        let claims = parse_jwt(&token, SECRET).unwrap();

        assert_eq!(claims.user_id, "42");
        assert_eq!(claims.role, "teacher");
        assert_eq!(claims.email, "ana@classconnect.io");
        assert_eq!(claims.user_name, "Ana");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = generate_jwt("42", "user", "a@b.c", "A", SECRET).unwrap();
        assert!(matches!(
            parse_jwt(&token, "other-secret"),
            Err(JwtError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse_jwt("not.a.token", SECRET),
            Err(JwtError::Invalid(_))
        ));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        // Two hours in the past clears the default validation leeway.
        let claims = Claims {
            user_id: "42".into(),
            role: "user".into(),
            email: "a@b.c".into(),
            user_name: "A".into(),
            exp: (Utc::now() - Duration::hours(2)).timestamp(),
        };
        let token = encode(
            &Header::new(JWT_ALGORITHM),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(parse_jwt(&token, SECRET), Err(JwtError::Expired)));
    }
}
