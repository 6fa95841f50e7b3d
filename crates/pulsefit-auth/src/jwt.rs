//! JWT creation and verification, the stateless credential verifier.
//!
//! Verification checks structural integrity, signature against the
//! process-wide secret, and expiry. It performs no I/O: the same token and
//! secret always produce the same result at a given instant.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use uuid::Uuid;

use crate::claims::{Claims, RefreshClaims};
use crate::config::JwtConfig;
use crate::error::TokenError;
use crate::identity::{Identity, Role};

/// Creates an access token carrying the subject, role, and verification claims.
pub fn create_access_token(
    user_id: i64,
    email: &str,
    role: Role,
    verified: bool,
    jwt_config: &JwtConfig,
) -> Result<String, TokenError> {
    let now = Utc::now().timestamp();
    let exp = (now + jwt_config.access_token_expiry) as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role,
        verified,
        exp,
        iat: now as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| TokenError::Encoding(e.to_string()))
}

/// Creates a long-lived refresh token.
pub fn create_refresh_token(
    user_id: i64,
    email: &str,
    jwt_config: &JwtConfig,
) -> Result<String, TokenError> {
    let now = Utc::now().timestamp();
    let exp = (now + jwt_config.refresh_token_expiry) as usize;

    let claims = RefreshClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp,
        iat: now as usize,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| TokenError::Encoding(e.to_string()))
}

/// Verifies an access token and returns its claims.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, TokenError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(classify_decode_error)
}

/// Verifies a refresh token and returns its claims.
pub fn verify_refresh_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<RefreshClaims, TokenError> {
    decode::<RefreshClaims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(classify_decode_error)
}

/// Verifies an access token and extracts the request identity from it.
///
/// An [`Identity`] is only ever constructed here, from claims that passed
/// signature and expiry checks.
pub fn authenticate(token: &str, jwt_config: &JwtConfig) -> Result<Identity, TokenError> {
    let claims = verify_token(token, jwt_config)?;
    Identity::from_claims(&claims)
}

fn classify_decode_error(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 604800,
        }
    }

    #[test]
    fn test_access_token_roundtrip() {
        let config = test_config();
        let token =
            create_access_token(42, "coach@example.com", Role::Instructor, true, &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "coach@example.com");
        assert_eq!(claims.role, Role::Instructor);
        assert!(claims.verified);
    }

    #[test]
    fn test_authenticate_builds_identity() {
        let config = test_config();
        let token = create_access_token(7, "member@example.com", Role::User, false, &config).unwrap();

        let identity = authenticate(&token, &config).unwrap();
        assert_eq!(identity.subject_id, 7);
        assert_eq!(identity.role, Role::User);
        assert!(!identity.verified);
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let config = test_config();
        assert_eq!(
            verify_token("not-a-token", &config).unwrap_err(),
            TokenError::Malformed
        );
    }

    #[test]
    fn test_wrong_secret_is_invalid_signature() {
        let config = test_config();
        let token = create_access_token(1, "a@example.com", Role::User, true, &config).unwrap();

        let other = JwtConfig {
            secret: "a-completely-different-32-character-secret".to_string(),
            ..config
        };

        assert_eq!(
            verify_token(&token, &other).unwrap_err(),
            TokenError::InvalidSignature
        );
    }

    #[test]
    fn test_expired_token_is_expired() {
        // Negative expiry puts `exp` far enough in the past to beat the
        // validator's default leeway.
        let config = JwtConfig {
            access_token_expiry: -7200,
            ..test_config()
        };
        let token = create_access_token(1, "a@example.com", Role::User, true, &config).unwrap();

        assert_eq!(
            verify_token(&token, &config).unwrap_err(),
            TokenError::Expired
        );
    }

    #[test]
    fn test_refresh_token_roundtrip() {
        let config = test_config();
        let token = create_refresh_token(9, "member@example.com", &config).unwrap();

        let claims = verify_refresh_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "9");
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_refresh_outlives_access() {
        let config = test_config();
        let access = create_access_token(9, "member@example.com", Role::User, true, &config).unwrap();
        let refresh = create_refresh_token(9, "member@example.com", &config).unwrap();

        let access_claims = verify_token(&access, &config).unwrap();
        let refresh_claims = verify_refresh_token(&refresh, &config).unwrap();
        assert!(refresh_claims.exp > access_claims.exp);
    }
}
