//! The per-request principal and the closed role enum.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::claims::Claims;
use crate::error::TokenError;

/// Closed set of roles a principal can hold.
///
/// Role checks are expressed against explicit role sets, with one stated
/// superset rule: `Admin` satisfies every role set, including sets that do
/// not name it. `Instructor` and `User` satisfy only sets that name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum Role {
    User,
    Instructor,
    Admin,
}

impl Role {
    /// Whether this role grants access to an endpoint restricted to `required`.
    pub fn satisfies(&self, required: &[Role]) -> bool {
        *self == Role::Admin || required.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
        }
    }
}

/// The authenticated principal for the current request.
///
/// Built exactly once per request by the request gate, from a token that
/// already passed signature and expiry verification; read-only afterwards
/// and dropped when the request completes. The `verified` flag mirrors the
/// account-verification claim carried in the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject_id: i64,
    pub role: Role,
    pub verified: bool,
}

impl Identity {
    /// Extracts the identity from verified claims.
    ///
    /// A subject claim that does not parse as a numeric user id means the
    /// token was not produced by this service, so it is reported as malformed.
    pub fn from_claims(claims: &Claims) -> Result<Self, TokenError> {
        let subject_id = claims.sub.parse().map_err(|_| TokenError::Malformed)?;

        Ok(Self {
            subject_id,
            role: claims.role,
            verified: claims.verified,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(sub: &str, role: Role) -> Claims {
        Claims {
            sub: sub.to_string(),
            email: "test@example.com".to_string(),
            role,
            verified: true,
            exp: 9999999999,
            iat: 1234567890,
        }
    }

    #[test]
    fn test_admin_satisfies_every_role_set() {
        assert!(Role::Admin.satisfies(&[Role::Admin]));
        assert!(Role::Admin.satisfies(&[Role::Instructor]));
        assert!(Role::Admin.satisfies(&[Role::User]));
        assert!(Role::Admin.satisfies(&[]));
    }

    #[test]
    fn test_non_admin_roles_need_explicit_membership() {
        assert!(Role::Instructor.satisfies(&[Role::Instructor, Role::Admin]));
        assert!(!Role::Instructor.satisfies(&[Role::Admin]));
        assert!(!Role::User.satisfies(&[Role::Instructor, Role::Admin]));
        assert!(Role::User.satisfies(&[Role::User]));
        assert!(!Role::User.satisfies(&[]));
    }

    #[test]
    fn test_identity_from_claims() {
        let identity = Identity::from_claims(&claims("42", Role::Instructor)).unwrap();
        assert_eq!(identity.subject_id, 42);
        assert_eq!(identity.role, Role::Instructor);
        assert!(identity.verified);
        assert!(!identity.is_admin());
    }

    #[test]
    fn test_non_numeric_subject_is_malformed() {
        let result = Identity::from_claims(&claims("not-a-number", Role::User));
        assert_eq!(result.unwrap_err(), TokenError::Malformed);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Instructor).unwrap(), "\"instructor\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }
}
