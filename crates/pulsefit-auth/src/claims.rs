//! JWT claim structures for authentication tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::identity::Role;

/// JWT claims for access tokens.
///
/// Everything needed for an authorization decision is embedded in the token,
/// so no session store or database lookup happens during authentication.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim), stringified numeric id
    pub sub: String,
    /// User's email address
    pub email: String,
    /// Role held by the user at token issue time
    pub role: Role,
    /// Whether the account has completed verification
    pub verified: bool,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

/// JWT claims for refresh tokens.
///
/// Long-lived, used only to obtain a fresh access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// User ID (subject claim)
    pub sub: String,
    /// User's email address
    pub email: String,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
    /// Unique token identifier (JWT ID)
    pub jti: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_roundtrip() {
        let claims = Claims {
            sub: "17".to_string(),
            email: "coach@example.com".to_string(),
            role: Role::Instructor,
            verified: true,
            exp: 9999999999,
            iat: 1234567890,
        };

        let json = serde_json::to_string(&claims).unwrap();
        assert!(json.contains(r#""sub":"17""#));
        assert!(json.contains(r#""role":"instructor""#));

        let back: Claims = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sub, claims.sub);
        assert_eq!(back.role, claims.role);
        assert!(back.verified);
    }
}
